// ==========================================
// 生产追踪系统 - 数据加载错误类型
// ==========================================
// 分类: 传输（网络/超时/HTTP 状态）、数据形态（解码/缺失/为空）、业务（服务端报错）
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据加载错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    // ===== 传输错误 =====
    #[error("请求超时 ({action}): 超过 {timeout_ms} 毫秒未响应")]
    Timeout { action: String, timeout_ms: u64 },

    #[error("网络请求失败 ({action}): {message}")]
    Network { action: String, message: String },

    #[error("HTTP 状态异常 ({action}): {status}")]
    HttpStatus { action: String, status: u16 },

    // ===== 数据形态错误 =====
    #[error("响应解析失败 ({action}): {message}")]
    Decode { action: String, message: String },

    #[error("数据集为空 ({action}): {collection}")]
    EmptyCollection { action: String, collection: String },

    #[error("响应缺少字段 ({action}): {field}")]
    MissingField { action: String, field: String },

    // ===== 业务错误 =====
    #[error("服务端返回错误 ({action}): {message}")]
    Api { action: String, message: String },
}

impl LoadError {
    /// 触发错误的 action
    pub fn action(&self) -> &str {
        match self {
            LoadError::Timeout { action, .. }
            | LoadError::Network { action, .. }
            | LoadError::HttpStatus { action, .. }
            | LoadError::Decode { action, .. }
            | LoadError::EmptyCollection { action, .. }
            | LoadError::MissingField { action, .. }
            | LoadError::Api { action, .. } => action,
        }
    }

    /// 是否为传输层错误
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LoadError::Timeout { .. } | LoadError::Network { .. } | LoadError::HttpStatus { .. }
        )
    }

    /// 由 reqwest 错误转换（超时单独归类）
    pub fn from_reqwest(action: &str, timeout_ms: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoadError::Timeout {
                action: action.to_string(),
                timeout_ms,
            }
        } else if err.is_decode() {
            LoadError::Decode {
                action: action.to_string(),
                message: err.to_string(),
            }
        } else {
            LoadError::Network {
                action: action.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;
