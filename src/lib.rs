// ==========================================
// 生产追踪系统 - 核心库
// ==========================================
// 范围: 生产实绩看板、实绩录入、换模记录、模具故障记录、报表导出
// 数据源: 表格型 HTTP API（本库不含服务端逻辑、不做本地持久化）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 筛选、聚合、派生公式
pub mod engine;

// 加载层 - 远程数据源
pub mod loader;

// 导出层 - CSV
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 屏幕控制器
pub mod api;

// 应用层 - 装配与会话
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BreakdownSeverity, GroupLine, PerformanceCategory, TimeInputMethod};

// 领域实体
pub use domain::{
    DandoriEntry, MachineMetric, MasterDies, ProductionEntry, ProductionRecord, ReportPayload,
};

// 引擎
pub use engine::{
    aggregate_by_date, aggregate_by_machine, categorize_by_threshold, filter_records,
    FilterCriteria,
};

// 加载
pub use loader::{HttpRecordSource, LoadError, RecordLoader, RecordSource};

// API
pub use api::{
    ApiError, ApiResult, BreakdownApi, DandoriApi, DashboardApi, ProductionInputApi,
    ReportExportApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产追踪系统";
