// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）、中文与印尼文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::production::SubmitAlert;
use crate::domain::types::{BreakdownSeverity, PerformanceCategory};

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "zh-CN", "id"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（不支持的语言回落到 en）
///
/// # 参数
/// - locale: 语言代码（"en"、"zh-CN" 或 "id"）
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "不支持的语言，使用 en");
        rust_i18n::set_locale("en");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use production_tracking::i18n::t;
/// let msg = t("error.no_matching_data");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use production_tracking::i18n::t_with_args;
/// let msg = t_with_args("error.http_status", &[("status", "502")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 严重度展示文本
pub fn severity_label(severity: BreakdownSeverity) -> String {
    t(severity.i18n_key())
}

/// 绩效分级展示文本
pub fn category_label(category: PerformanceCategory) -> String {
    match category {
        PerformanceCategory::Excellent => t("status.excellent"),
        PerformanceCategory::Good => t("status.good"),
        PerformanceCategory::Poor => t("status.poor"),
    }
}

/// 实绩提交提示文本
pub fn alert_message(alert: SubmitAlert) -> String {
    match alert {
        SubmitAlert::Overproduction => t("alert.overproduction"),
        SubmitAlert::Delayed => t("alert.delayed"),
        SubmitAlert::Optimal => t("alert.optimal"),
    }
}
