// ==========================================
// 生产追踪系统 - 看板 API
// ==========================================
// 职责: 生产实绩加载、筛选、汇总与图表数据、CSV 导出、报表交接
// 会话: DashboardSession 由本控制器独占；引擎函数以其为输入
// 红线: 加载失败或筛选为空时保留上一次的数据
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::app::session::HandoffStore;
use crate::domain::metrics::{DailyPerformance, DashboardSummary, MachineMetric, PerformanceDistribution};
use crate::domain::production::ProductionRecord;
use crate::domain::report::ReportPayload;
use crate::domain::types::PerformanceCategory;
use crate::engine::aggregation::{aggregate_by_date, aggregate_by_machine, categorize_by_threshold, summarize};
use crate::engine::filter::{distinct_sorted, filter_records, latest_record_date, FilterCriteria};
use crate::engine::report_builder::prepare_report_payload;
use crate::export::csv_export::export_metrics_csv;
use crate::loader::RecordLoader;
use crate::perf::PerfGuard;

// ==========================================
// 视图数据
// ==========================================

/// 下拉选项（去重排序）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub machines: Vec<String>,
    pub part_names: Vec<String>,
    pub part_numbers: Vec<String>,
}

/// 机台柱状图数据点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineBar {
    pub machine: String,
    pub average_performance: f64,
    pub category: PerformanceCategory,
    pub css_class: &'static str,
    pub color: &'static str,
}

/// 分布环形图切片
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub category: PerformanceCategory,
    pub count: usize,
    pub share_percent: Option<f64>,
}

/// 看板视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub metrics: Vec<MachineMetric>,
    pub machine_bars: Vec<MachineBar>,
    pub daily_trend: Vec<DailyPerformance>,
    pub distribution: PerformanceDistribution,
    pub distribution_slices: Vec<DistributionSlice>,
}

impl DashboardView {
    fn build(filtered: &[ProductionRecord]) -> Self {
        let metrics = aggregate_by_machine(filtered);
        let summary = summarize(filtered.len(), &metrics);
        let machine_bars = metrics
            .iter()
            .map(|m| {
                let category = m.category();
                MachineBar {
                    machine: m.machine_name.clone(),
                    average_performance: m.average_performance,
                    category,
                    css_class: category.css_class(),
                    color: category.color(),
                }
            })
            .collect();
        let distribution = categorize_by_threshold(filtered);
        let distribution_slices = [
            PerformanceCategory::Excellent,
            PerformanceCategory::Good,
            PerformanceCategory::Poor,
        ]
        .into_iter()
        .map(|category| DistributionSlice {
            category,
            count: distribution.count(category),
            share_percent: distribution.share_percent(category),
        })
        .collect();

        Self {
            summary,
            metrics,
            machine_bars,
            daily_trend: aggregate_by_date(filtered),
            distribution,
            distribution_slices,
        }
    }
}

// ==========================================
// DashboardSession - 看板会话状态
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    pub raw_records: Vec<ProductionRecord>,
    pub filtered: Vec<ProductionRecord>,
    pub criteria: FilterCriteria,
    /// 默认日期范围（最新记录日期）
    pub default_range: Option<(NaiveDate, NaiveDate)>,
    pub options: FilterOptions,
}

impl DashboardSession {
    fn default_criteria(&self) -> FilterCriteria {
        match self.default_range {
            Some((from, to)) => FilterCriteria::date_range(from, to),
            None => FilterCriteria::default(),
        }
    }
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    loader: RecordLoader,
    handoff: Arc<HandoffStore>,
    session: DashboardSession,
}

impl DashboardApi {
    pub fn new(loader: RecordLoader, handoff: Arc<HandoffStore>) -> Self {
        Self {
            loader,
            handoff,
            session: DashboardSession::default(),
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn options(&self) -> &FilterOptions {
        &self.session.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.session.criteria
    }

    /// 加载生产实绩
    ///
    /// 成功后整体替换原始记录，默认日期范围取最新记录日期并应用筛选；
    /// 失败时保留上一次的数据
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> ApiResult<DashboardView> {
        let _perf = PerfGuard::new("dashboard_load");

        let records = match self.loader.load_production_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "生产实绩加载失败，保留现有数据");
                return Err(e.into());
            }
        };

        let latest = latest_record_date(&records);
        if latest.is_none() {
            warn!("记录中没有可解析的日期，默认不限日期");
        }

        self.session.options = FilterOptions {
            machines: distinct_sorted(&records, |r| r.machine.as_str()),
            part_names: distinct_sorted(&records, |r| r.part_name.as_str()),
            part_numbers: distinct_sorted(&records, |r| r.part_number.as_str()),
        };
        self.session.default_range = latest.map(|d| (d, d));
        self.session.raw_records = records;
        self.session.criteria = self.session.default_criteria();
        self.session.filtered = filter_records(&self.session.raw_records, &self.session.criteria);

        info!(
            raw = self.session.raw_records.len(),
            filtered = self.session.filtered.len(),
            "看板数据就绪"
        );
        Ok(self.view())
    }

    /// 应用筛选条件
    ///
    /// 结果为空时返回 NoMatchingData，且保留上一次的筛选结果
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> ApiResult<DashboardView> {
        if self.session.raw_records.is_empty() {
            return Err(ApiError::NoData);
        }

        let filtered = filter_records(&self.session.raw_records, &criteria);
        debug!(
            raw = self.session.raw_records.len(),
            filtered = filtered.len(),
            "应用筛选"
        );
        if filtered.is_empty() {
            return Err(ApiError::NoMatchingData);
        }

        self.session.criteria = criteria;
        self.session.filtered = filtered;
        Ok(self.view())
    }

    /// 恢复默认筛选（默认日期范围，无精确匹配条件）
    pub fn reset_filters(&mut self) -> ApiResult<DashboardView> {
        let criteria = self.session.default_criteria();
        self.apply_filters(criteria)
    }

    /// 当前视图（由筛选结果重新计算）
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.session.filtered)
    }

    /// 当前机台指标
    pub fn metrics(&self) -> Vec<MachineMetric> {
        aggregate_by_machine(&self.session.filtered)
    }

    fn range_labels(&self) -> (String, String) {
        let label = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "all".to_string());
        (label(self.session.criteria.date_from), label(self.session.criteria.date_to))
    }

    /// 导出当前机台指标为 CSV
    pub fn export_csv(&self, dir: &Path) -> ApiResult<PathBuf> {
        let metrics = self.metrics();
        if metrics.is_empty() {
            return Err(ApiError::NoData);
        }
        let (from, to) = self.range_labels();
        Ok(export_metrics_csv(dir, &metrics, &from, &to)?)
    }

    /// 预备报表载荷并写入交接存储
    ///
    /// # 参数
    /// - sequence: 文档序号（None 时不生成文档编号）
    pub fn prepare_report(&self, sequence: Option<u32>) -> ApiResult<ReportPayload> {
        if self.session.filtered.is_empty() {
            return Err(ApiError::NoData);
        }

        let metrics = self.metrics();
        let payload = prepare_report_payload(
            &self.session.filtered,
            &metrics,
            self.session.criteria.date_from,
            self.session.criteria.date_to,
            sequence,
        );
        self.handoff.put_report(&payload)?;
        info!(
            records = payload.records.len(),
            machines = payload.machines.len(),
            "报表载荷已写入交接存储"
        );
        Ok(payload)
    }
}
