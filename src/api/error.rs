// ==========================================
// 生产追踪系统 - API层错误类型
// ==========================================
// 职责: 定义屏幕控制器错误类型，转换加载/导出/配置错误为用户可见通知
// 策略: 错误在发起操作处捕获并转为通知；不吞错、不重试
// ==========================================

use std::fmt;
use thiserror::Error;

use crate::config::config_manager::ConfigError;
use crate::export::error::ExportError;
use crate::i18n::{t, t_with_args};
use crate::loader::error::LoadError;

// ==========================================
// 校验规则
// ==========================================

/// 表单校验失败的规则
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    /// 必填项为空
    Required,
    /// 必须从列表中选择
    NotInList,
    /// 数值低于下限
    MinValue(i64),
    /// 结束时间必须晚于开始时间
    EndNotAfterStart,
    /// 结束时间不能与开始时间相同
    SameTime,
    /// 所选产线超过上限
    TooManyLines(usize),
    /// 开始日期晚于结束日期
    RangeInverted,
    /// 日期跨度超过上限（天）
    RangeTooLong(i64),
    /// 合计必须大于 0
    TotalZero,
}

impl ValidationRule {
    /// 本地化说明
    pub fn message(&self) -> String {
        match self {
            ValidationRule::Required => t("validation.required"),
            ValidationRule::NotInList => t("validation.not_in_list"),
            ValidationRule::MinValue(min) => {
                t_with_args("validation.min_value", &[("min", &min.to_string())])
            }
            ValidationRule::EndNotAfterStart => t("validation.end_not_after_start"),
            ValidationRule::SameTime => t("validation.same_time"),
            ValidationRule::TooManyLines(max) => {
                t_with_args("validation.too_many_lines", &[("max", &max.to_string())])
            }
            ValidationRule::RangeInverted => t("validation.range_inverted"),
            ValidationRule::RangeTooLong(max) => {
                t_with_args("validation.range_too_long", &[("max", &max.to_string())])
            }
            ValidationRule::TotalZero => t("validation.total_zero"),
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::Required => write!(f, "必填"),
            ValidationRule::NotInList => write!(f, "必须从列表中选择"),
            ValidationRule::MinValue(min) => write!(f, "不能小于 {}", min),
            ValidationRule::EndNotAfterStart => write!(f, "结束时间必须晚于开始时间"),
            ValidationRule::SameTime => write!(f, "结束时间不能与开始时间相同"),
            ValidationRule::TooManyLines(max) => write!(f, "最多选择 {} 条产线", max),
            ValidationRule::RangeInverted => write!(f, "开始日期晚于结束日期"),
            ValidationRule::RangeTooLong(max) => write!(f, "日期跨度超过 {} 天", max),
            ValidationRule::TotalZero => write!(f, "合计必须大于 0"),
        }
    }
}

// ==========================================
// ApiError
// ==========================================

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 加载/提交 =====
    #[error("数据加载失败: {0}")]
    Load(#[from] LoadError),

    /// 主数据未就绪（屏幕只能重试）
    #[error("主数据未加载: {0}")]
    NotReady(String),

    // ===== 校验 =====
    #[error("字段校验失败: {field} ({rule})")]
    Validation {
        field: &'static str,
        rule: ValidationRule,
    },

    // ===== 空结果 =====
    #[error("没有符合筛选条件的数据")]
    NoMatchingData,

    #[error("没有可用数据")]
    NoData,

    #[error("报表数据不存在或已过期")]
    HandoffMissing,

    // ===== 导出/配置 =====
    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn validation(field: &'static str, rule: ValidationRule) -> Self {
        ApiError::Validation { field, rule }
    }

    /// 是否为校验错误（校验错误不会触达网络层）
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    /// 用户可见通知文本
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Load(err) => load_error_message(err),
            ApiError::NotReady(what) => t_with_args("error.not_ready", &[("what", what)]),
            ApiError::Validation { field, rule } => t_with_args(
                "error.validation",
                &[("field", &t(&format!("field.{}", field))), ("reason", &rule.message())],
            ),
            ApiError::NoMatchingData => t("error.no_matching_data"),
            ApiError::NoData => t("error.no_data"),
            ApiError::HandoffMissing => t("error.handoff_missing"),
            ApiError::Export(ExportError::NoData) => t("error.no_data"),
            ApiError::Export(err) => t_with_args("error.export", &[("message", &err.to_string())]),
            ApiError::Config(err) => t_with_args("error.config", &[("message", &err.to_string())]),
        }
    }
}

fn load_error_message(err: &LoadError) -> String {
    match err {
        LoadError::Timeout { action, timeout_ms } => t_with_args(
            "error.timeout",
            &[("action", action), ("seconds", &(timeout_ms / 1000).to_string())],
        ),
        LoadError::Network { message, .. } => t_with_args("error.network", &[("message", message)]),
        LoadError::HttpStatus { status, .. } => {
            t_with_args("error.http_status", &[("status", &status.to_string())])
        }
        LoadError::Decode { message, .. } => t_with_args("error.decode", &[("message", message)]),
        LoadError::EmptyCollection { .. } => t("error.empty_collection"),
        LoadError::MissingField { field, .. } => {
            t_with_args("error.missing_field", &[("field", field)])
        }
        LoadError::Api { message, .. } => t_with_args("error.api", &[("message", message)]),
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_load_error() {
        let err: ApiError = LoadError::EmptyCollection {
            action: "getAchievementData".to_string(),
            collection: "records".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Load(LoadError::EmptyCollection { .. })));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_display_names_field() {
        let err = ApiError::validation("qty_spk", ValidationRule::MinValue(1));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "字段校验失败: qty_spk (不能小于 1)");
    }
}
