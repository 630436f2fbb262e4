// ==========================================
// 生产追踪系统 - 数据源配置读取 Trait
// ==========================================
// 职责: 定义各屏幕控制器所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（JSON 文件 + 环境变量）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::{config_keys, ConfigResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 屏幕（每个屏幕可配置独立的数据源地址）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    ProductionInput,
    Dandori,
    Breakdown,
    ReportExport,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Dashboard,
        Screen::ProductionInput,
        Screen::Dandori,
        Screen::Breakdown,
        Screen::ReportExport,
    ];

    /// 对应的配置键
    pub fn config_key(&self) -> &'static str {
        match self {
            Screen::Dashboard => config_keys::ENDPOINT_DASHBOARD,
            Screen::ProductionInput => config_keys::ENDPOINT_PRODUCTION_INPUT,
            Screen::Dandori => config_keys::ENDPOINT_DANDORI,
            Screen::Breakdown => config_keys::ENDPOINT_BREAKDOWN,
            Screen::ReportExport => config_keys::ENDPOINT_REPORT_EXPORT,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Dashboard => "dashboard",
            Screen::ProductionInput => "production_input",
            Screen::Dandori => "dandori",
            Screen::Breakdown => "breakdown",
            Screen::ReportExport => "report_export",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// EndpointConfigReader Trait
// ==========================================
#[async_trait]
pub trait EndpointConfigReader: Send + Sync {
    // ===== 数据源 =====

    /// 屏幕对应的数据源地址
    ///
    /// # 返回
    /// - Err(MissingEndpoint): 既没有屏幕专属地址也没有通用地址
    async fn get_endpoint(&self, screen: Screen) -> ConfigResult<String>;

    /// 单次请求超时（默认 30 秒）
    async fn get_request_timeout(&self) -> ConfigResult<Duration>;

    /// 产线记录数估算超时（默认 10 秒）
    async fn get_estimate_timeout(&self) -> ConfigResult<Duration>;

    // ===== 防抖 =====

    /// 看板筛选防抖（默认 300ms）
    async fn get_dashboard_debounce(&self) -> ConfigResult<Duration>;

    /// 报表日期变更防抖（默认 500ms）
    async fn get_report_debounce(&self) -> ConfigResult<Duration>;

    // ===== 报表 =====

    /// 最多可选产线数（默认 3）
    async fn get_max_selectable_lines(&self) -> ConfigResult<usize>;

    /// 报表最长日期跨度（默认 90 天）
    async fn get_max_report_range_days(&self) -> ConfigResult<i64>;

    /// 单页最佳记录数（默认 25）
    async fn get_optimal_records_per_page(&self) -> ConfigResult<usize>;

    // ===== 其他 =====

    /// 模具检索结果上限（默认 50）
    async fn get_autocomplete_limit(&self) -> ConfigResult<usize>;

    /// 报表交接数据有效期（默认 300 秒）
    async fn get_handoff_ttl(&self) -> ConfigResult<Duration>;

    /// 界面语言（默认 en）
    async fn get_locale(&self) -> ConfigResult<String>;
}
