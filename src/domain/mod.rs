// ==========================================
// 生产追踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型、表格数据解码规则
// 红线: 不含网络访问逻辑,不含引擎逻辑
// ==========================================

pub mod breakdown;
pub mod dandori;
pub mod lenient;
pub mod master;
pub mod metrics;
pub mod production;
pub mod report;
pub mod types;

// 重导出核心类型
pub use breakdown::{BreakdownEntry, BreakdownReceipt};
pub use dandori::{DandoriActivity, DandoriEntry, DandoriStatus};
pub use master::{
    DandoriMachine, DandoriMaster, DandoriPart, DropdownData, LkdCounter, LossCode, MasterDies,
    PartProcess,
};
pub use metrics::{
    DailyPerformance, DashboardSummary, MachineMetric, MachineScore, PerformanceDistribution,
};
pub use production::{ProductionEntry, ProductionRecord, SubmitAlert, SubmitMetrics};
pub use report::{
    ChartData, MachinePerformance, MachineRef, ReportHeader, ReportPayload, ReportRow,
    ReportSummary,
};
pub use types::{
    BreakdownSeverity, GroupLine, LineDescriptor, PerformanceCategory, TimeInputMethod,
    EXCELLENT_THRESHOLD, GOOD_THRESHOLD,
};
