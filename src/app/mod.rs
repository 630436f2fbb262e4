// ==========================================
// 生产追踪系统 - 应用层
// ==========================================
// 职责: 控制器装配、跨屏幕交接存储、防抖
// ==========================================

pub mod debounce;
pub mod session;
pub mod state;

// 重导出
pub use debounce::Debouncer;
pub use session::{HandoffStore, REPORT_DATA_KEY};
pub use state::{get_default_config_path, http_loader, report_settings, AppState};
