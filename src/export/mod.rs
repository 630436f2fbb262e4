// ==========================================
// 生产追踪系统 - 导出层
// ==========================================
// 职责: CSV 文件导出（PDF 渲染在外部完成，这里只提供文件名与版面数据）
// ==========================================

pub mod csv_export;
pub mod error;

pub use csv_export::{csv_filename, export_metrics_csv, metrics_to_csv_string, write_metrics_csv};
pub use error::{ExportError, ExportResult};
