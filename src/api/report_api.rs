// ==========================================
// 生产追踪系统 - 报表导出 API
// ==========================================
// 职责:
// - 产线选项加载与按产线的记录数估算（防抖）
// - 选择预览、报表请求校验与报表数据加载
// - 看板交接载荷的读取（读取即删除）
// - 报表视图：按产线过滤机台/图表、表头文本、PDF 文件名与版面
// 红线: 产线主数据加载失败时只允许重试
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult, ValidationRule};
use crate::api::validator::validate_report_request;
use crate::app::debounce::Debouncer;
use crate::app::session::HandoffStore;
use crate::domain::report::{ChartData, MachineRef, ReportPayload};
use crate::domain::types::{GroupLine, LineDescriptor};
use crate::engine::report_builder::{
    estimate_records_per_line, extract_group_lines, filter_chart_by_lines,
    filter_machines_by_lines, fit_a4_landscape, header_display, loading_cells, pdf_filename,
    selection_preview, visible_capacity, visible_performance, HeaderDisplay, LineEstimate,
    LineOption, PageFit, SelectionPreview,
};
use crate::loader::{LoadError, RecordLoader};
use crate::perf::PerfGuard;

/// 报表屏幕参数
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub max_lines: usize,
    pub max_range_days: i64,
    pub optimal_per_page: usize,
    pub estimate_timeout: Duration,
    pub debounce: Duration,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_lines: 3,
            max_range_days: 90,
            optimal_per_page: 25,
            estimate_timeout: Duration::from_secs(10),
            debounce: Duration::from_millis(500),
        }
    }
}

// ==========================================
// 报表视图
// ==========================================

/// 表格行（按可见机台展开负荷列）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTableRow {
    pub part_name: String,
    pub part_no: String,
    pub process: String,
    pub machine: String,
    pub qty_spk: u64,
    pub qty_prod: u64,
    pub act_time: f64,
    pub sph_act: i64,
    pub cycle_time: f64,
    pub process_time: f64,
    pub performance_score: f64,
    pub loading: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub header: HeaderDisplay,
    pub machines: Vec<MachineRef>,
    pub rows: Vec<ReportTableRow>,
    pub chart: ChartData,
    pub capacity: Vec<(String, f64)>,
    pub performance: Vec<(String, f64)>,
    pub pdf_filename: String,
}

impl ReportView {
    pub fn build(payload: &ReportPayload) -> Self {
        let machines = filter_machines_by_lines(&payload.machines, &payload.records);
        let chart = payload
            .chart_data
            .as_ref()
            .map(|c| filter_chart_by_lines(c, &payload.records))
            .unwrap_or_default();

        let rows = payload
            .records
            .iter()
            .map(|r| ReportTableRow {
                part_name: r.part_name.clone(),
                part_no: r.part_no.clone(),
                process: r.process.clone(),
                machine: r.machine.clone(),
                qty_spk: r.qty_spk,
                qty_prod: r.qty_prod,
                act_time: r.act_time,
                sph_act: r.sph_act_rounded(),
                cycle_time: r.cycle_time,
                process_time: r.process_time(),
                performance_score: r.performance_score,
                loading: loading_cells(r, &machines),
            })
            .collect();

        let (capacity, performance) = match &payload.summary {
            Some(summary) => (
                visible_capacity(summary, &machines),
                visible_performance(summary, &machines),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let lines: Vec<GroupLine> = payload
            .header
            .group_line_filter
            .iter()
            .filter_map(|l| GroupLine::parse(l))
            .collect();

        Self {
            header: header_display(&payload.header, payload.records.len()),
            machines,
            rows,
            chart,
            capacity,
            performance,
            pdf_filename: pdf_filename(&payload.header.date_from, &payload.header.date_to, &lines),
        }
    }
}

// ==========================================
// ReportSession
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReportSession {
    /// None 表示产线主数据未就绪
    pub line_options: Option<Vec<LineOption>>,
    pub selected: Vec<GroupLine>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub report: Option<ReportPayload>,
}

pub struct ReportExportApi {
    loader: RecordLoader,
    handoff: Arc<HandoffStore>,
    settings: ReportSettings,
    debouncer: Debouncer,
    session: ReportSession,
}

impl ReportExportApi {
    pub fn new(loader: RecordLoader, handoff: Arc<HandoffStore>, settings: ReportSettings) -> Self {
        let debouncer = Debouncer::new(settings.debounce);
        Self {
            loader,
            handoff,
            settings,
            debouncer,
            session: ReportSession::default(),
        }
    }

    pub fn session(&self) -> &ReportSession {
        &self.session
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.session.line_options.is_some()
    }

    fn options(&self) -> ApiResult<&[LineOption]> {
        self.session
            .line_options
            .as_deref()
            .ok_or_else(|| ApiError::NotReady("groupLines".to_string()))
    }

    // ===== 交接 =====

    /// 读取看板预备的报表载荷（读取即删除，缺失为致命错误）
    pub fn open_prepared(&mut self) -> ApiResult<ReportView> {
        let payload = self.handoff.take_report()?.ok_or(ApiError::HandoffMissing)?;
        let view = ReportView::build(&payload);
        info!(records = payload.records.len(), "已读取交接报表载荷");
        self.session.report = Some(payload);
        Ok(view)
    }

    // ===== 产线 =====

    /// 加载可选产线
    #[instrument(skip(self))]
    pub async fn load_group_lines(&mut self) -> ApiResult<&[LineOption]> {
        let _perf = PerfGuard::new("report_load_group_lines");
        let data = match self.loader.load_dropdowns().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "产线主数据加载失败，仅允许重试");
                self.session.line_options = None;
                return Err(e.into());
            }
        };

        let lines = extract_group_lines(&data);
        if lines.is_empty() {
            self.session.line_options = None;
            return Err(LoadError::EmptyCollection {
                action: "getDropdowns".to_string(),
                collection: "groupLines".to_string(),
            }
            .into());
        }

        info!(lines = lines.len(), "产线选项就绪");
        self.session.selected.retain(|l| lines.contains(l));
        self.session.line_options = Some(
            lines
                .into_iter()
                .map(|line| LineOption {
                    line,
                    descriptor: LineDescriptor::for_line(line),
                    estimate: None,
                })
                .collect(),
        );
        self.options()
    }

    /// 切换产线勾选；禁用的产线不可勾选
    pub fn toggle_line(&mut self, line: GroupLine) -> ApiResult<bool> {
        let option = self
            .options()?
            .iter()
            .find(|o| o.line == line)
            .cloned()
            .ok_or_else(|| ApiError::validation("group_lines", ValidationRule::NotInList))?;

        if let Some(pos) = self.session.selected.iter().position(|l| *l == line) {
            self.session.selected.remove(pos);
            return Ok(false);
        }
        if !option.enabled() {
            return Ok(false);
        }
        self.session.selected.push(line);
        self.session.selected.sort();
        Ok(true)
    }

    pub fn set_dates(&mut self, date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) {
        self.session.date_from = date_from;
        self.session.date_to = date_to;
    }

    // ===== 估算 =====

    /// 拉取并统计各产线记录数；请求失败时全部标记为未知
    pub async fn fetch_estimates(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ApiResult<BTreeMap<GroupLine, LineEstimate>> {
        let lines: Vec<GroupLine> = self.options()?.iter().map(|o| o.line).collect();
        let estimates = match self
            .loader
            .fetch_report_records(date_from, date_to, self.settings.estimate_timeout)
            .await
        {
            Ok(records) => estimate_records_per_line(&lines, &records)
                .into_iter()
                .map(|(line, n)| (line, LineEstimate::Known(n)))
                .collect(),
            Err(e) => {
                warn!(error = %e, "产线记录数估算失败");
                lines.into_iter().map(|l| (l, LineEstimate::Unknown)).collect()
            }
        };
        Ok(estimates)
    }

    /// 防抖估算：等待期间有新的日期输入则返回 None
    pub async fn fetch_estimates_debounced(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Option<ApiResult<BTreeMap<GroupLine, LineEstimate>>> {
        self.debouncer
            .call(|| self.fetch_estimates(date_from, date_to))
            .await
    }

    /// 写入估算结果；估算为 0 的产线取消勾选
    pub fn apply_estimates(&mut self, estimates: &BTreeMap<GroupLine, LineEstimate>) {
        if let Some(options) = self.session.line_options.as_mut() {
            for option in options.iter_mut() {
                option.estimate = estimates.get(&option.line).copied();
            }
            let disabled: Vec<GroupLine> = options
                .iter()
                .filter(|o| !o.enabled())
                .map(|o| o.line)
                .collect();
            self.session.selected.retain(|l| !disabled.contains(l));
        }
    }

    /// 设置日期并立即估算
    pub async fn estimate(&mut self, date_from: NaiveDate, date_to: NaiveDate) -> ApiResult<&[LineOption]> {
        self.set_dates(Some(date_from), Some(date_to));
        let estimates = self.fetch_estimates(date_from, date_to).await?;
        self.apply_estimates(&estimates);
        self.options()
    }

    /// 选择预览
    pub fn preview(&self) -> Option<SelectionPreview> {
        selection_preview(
            self.session.date_from,
            self.session.date_to,
            &self.session.selected,
            self.session.line_options.as_deref().unwrap_or(&[]),
            self.settings.max_lines,
            self.settings.optimal_per_page,
        )
    }

    // ===== 生成 =====

    /// 校验并加载报表数据
    #[instrument(skip(self))]
    pub async fn generate(&mut self) -> ApiResult<ReportView> {
        let (from, to) = validate_report_request(
            self.session.date_from,
            self.session.date_to,
            &self.session.selected,
            self.settings.max_lines,
            self.settings.max_range_days,
        )?;

        let _perf = PerfGuard::new("report_generate");
        let payload = self
            .loader
            .load_report_data(from, to, &self.session.selected)
            .await?;
        let view = ReportView::build(&payload);
        info!(
            records = payload.records.len(),
            machines = view.machines.len(),
            "报表生成完成"
        );
        self.session.report = Some(payload);
        Ok(view)
    }

    /// 当前报表的 PDF 版面
    pub fn page_fit(&self, canvas_width: f64, canvas_height: f64) -> ApiResult<PageFit> {
        if self.session.report.is_none() {
            return Err(ApiError::NoData);
        }
        fit_a4_landscape(canvas_width, canvas_height).ok_or(ApiError::NoData)
    }
}
