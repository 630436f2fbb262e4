// ==========================================
// 生产追踪系统 - API 层
// ==========================================
// 职责: 每个屏幕一个控制器，持有该屏幕的会话状态
// ==========================================

pub mod breakdown_api;
pub mod dandori_api;
pub mod dashboard_api;
pub mod error;
pub mod production_api;
pub mod report_api;
pub mod validator;

// 重导出核心类型
pub use breakdown_api::{BreakdownApi, BreakdownDurations, BreakdownTimes};
pub use dandori_api::{DandoriApi, DandoriHeader};
pub use dashboard_api::{DashboardApi, DashboardView, FilterOptions};
pub use error::{ApiError, ApiResult, ValidationRule};
pub use production_api::{ProductionInputApi, SubmitOutcome};
pub use report_api::{ReportExportApi, ReportSettings, ReportView};
pub use validator::ProductionForm;
