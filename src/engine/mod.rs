// ==========================================
// 生产追踪系统 - 引擎层
// ==========================================
// 职责: 筛选、聚合、派生公式、检索、单据编号、报表构建
// 红线: 引擎不发请求、不持有会话状态，全部为纯函数
// ==========================================

pub mod aggregation;
pub mod autocomplete;
pub mod dandori;
pub mod document_number;
pub mod filter;
pub mod formulas;
pub mod report_builder;

// 重导出核心引擎
pub use aggregation::{
    aggregate_by_date, aggregate_by_machine, categorize_by_threshold, overall_average, summarize,
};
pub use autocomplete::{search_dandori_parts, search_dies, search_part_names};
pub use dandori::{dandori_status, ActivitySheet};
pub use document_number::{achievement_number, lkd_number_preview, to_roman_month};
pub use filter::{distinct_sorted, filter_records, latest_record_date, FilterCriteria};
pub use formulas::{
    classify_severity, cycle_time_seconds, elapsed_hours, elapsed_minutes, shift_duration_minutes,
    sph_actual,
};
pub use report_builder::{
    date_range_days, estimate_records_per_line, extract_group_lines, filter_machines_by_lines,
    fit_a4_landscape, pdf_filename, prepare_report_payload, LayoutHint, LineEstimate, LineOption,
    PageFit,
};
