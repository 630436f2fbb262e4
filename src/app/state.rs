// ==========================================
// 生产追踪系统 - 应用状态
// ==========================================
// 职责: 按配置为各屏幕创建数据源与控制器，共享交接存储
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{BreakdownApi, DandoriApi, DashboardApi, ProductionInputApi, ReportExportApi, ReportSettings};
use crate::app::session::HandoffStore;
use crate::config::{ConfigManager, ConfigResult, EndpointConfigReader, Screen};
use crate::loader::{HttpRecordSource, RecordLoader, RecordSource};

/// 应用状态
///
/// 每个屏幕控制器独占自己的会话状态；交接存储在看板与报表之间共享
pub struct AppState {
    pub dashboard_api: DashboardApi,
    pub production_api: ProductionInputApi,
    pub dandori_api: DandoriApi,
    pub breakdown_api: BreakdownApi,
    pub report_api: ReportExportApi,
    pub handoff: Arc<HandoffStore>,
}

/// 为屏幕创建 HTTP 加载器
pub async fn http_loader(
    config: &dyn EndpointConfigReader,
    screen: Screen,
) -> ConfigResult<RecordLoader> {
    let endpoint = config.get_endpoint(screen).await?;
    let timeout = config.get_request_timeout().await?;
    let source: Arc<dyn RecordSource> = Arc::new(HttpRecordSource::new(endpoint, timeout));
    Ok(RecordLoader::new(source))
}

/// 报表屏幕参数
pub async fn report_settings(config: &dyn EndpointConfigReader) -> ConfigResult<ReportSettings> {
    Ok(ReportSettings {
        max_lines: config.get_max_selectable_lines().await?,
        max_range_days: config.get_max_report_range_days().await?,
        optimal_per_page: config.get_optimal_records_per_page().await?,
        estimate_timeout: config.get_estimate_timeout().await?,
        debounce: config.get_report_debounce().await?,
    })
}

impl AppState {
    /// 按配置创建全部控制器
    ///
    /// # 返回
    /// - Err(MissingEndpoint): 任一屏幕没有可用的数据源地址
    pub async fn new(config: &dyn EndpointConfigReader) -> ConfigResult<Self> {
        tracing::info!("初始化 AppState");

        let handoff = Arc::new(HandoffStore::new(config.get_handoff_ttl().await?));
        let search_limit = config.get_autocomplete_limit().await?;

        Ok(Self {
            dashboard_api: DashboardApi::new(
                http_loader(config, Screen::Dashboard).await?,
                handoff.clone(),
            ),
            production_api: ProductionInputApi::new(
                http_loader(config, Screen::ProductionInput).await?,
            ),
            dandori_api: DandoriApi::new(http_loader(config, Screen::Dandori).await?),
            breakdown_api: BreakdownApi::new(
                http_loader(config, Screen::Breakdown).await?,
                search_limit,
            ),
            report_api: ReportExportApi::new(
                http_loader(config, Screen::ReportExport).await?,
                handoff.clone(),
                report_settings(config).await?,
            ),
            handoff,
        })
    }
}

/// 获取默认配置文件路径
pub fn get_default_config_path() -> Option<PathBuf> {
    ConfigManager::default_path()
}
