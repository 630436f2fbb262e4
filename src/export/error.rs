// ==========================================
// 生产追踪系统 - 导出错误类型
// ==========================================
// 覆盖: CSV 写出、报表交接数据序列化
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可导出的数据")]
    NoData,

    #[error("CSV 写出失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件写入失败: {path}: {message}")]
    Io { path: String, message: String },

    #[error("输出流写入失败: {0}")]
    Stream(#[from] std::io::Error),

    #[error("文本编码失败: {0}")]
    Encoding(String),

    #[error("交接数据序列化失败: {0}")]
    Serialize(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
