// ==========================================
// 生产追踪系统 - 报表构建
// ==========================================
// 职责:
// - 看板 → 报表: 预备报表载荷（表头/明细/机台/图表/汇总）
// - 报表页: 产线提取、按产线估算记录数、选择预览、机台/图表按产线过滤
// - 导出: PDF 文件名、A4 横向页面适配几何
// 红线: 纯函数；渲染（图表/PDF 字节）在外部完成
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::lenient;
use crate::domain::master::DropdownData;
use crate::domain::metrics::MachineMetric;
use crate::domain::production::ProductionRecord;
use crate::domain::report::{
    ChartData, MachinePerformance, MachineRef, ReportHeader, ReportPayload, ReportRow,
    ReportSummary,
};
use crate::domain::types::{GroupLine, LineDescriptor};
use crate::engine::document_number::achievement_number;
use crate::engine::formulas::{cycle_time_seconds, sph_actual};

/// 首条记录无法推断产线名时的默认值
pub const DEFAULT_LINE_NAME: &str = "LINE A";

/// A4 横向宽度 (mm)
pub const A4_LANDSCAPE_WIDTH_MM: f64 = 297.0;
/// A4 横向高度 (mm)
pub const A4_LANDSCAPE_HEIGHT_MM: f64 = 210.0;

fn first_word(name: &str) -> &str {
    name.split(' ').next().unwrap_or("")
}

// ==========================================
// 报表载荷预备（看板页）
// ==========================================

/// 机台列表：去重、排序，简称取首个单词（为空时 M{序号}）
pub fn machine_refs(records: &[ProductionRecord]) -> Vec<MachineRef> {
    records
        .iter()
        .map(|r| r.machine.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let short = first_word(name);
            MachineRef {
                name: name.to_string(),
                short_name: if short.is_empty() {
                    format!("M{}", i + 1)
                } else {
                    short.to_string()
                },
            }
        })
        .collect()
}

/// 预备报表载荷
///
/// # 参数
/// - records: 筛选后的记录
/// - metrics: 对应的机台指标（已排序）
/// - sequence: 文档序号（缺失时不生成文档编号）
pub fn prepare_report_payload(
    records: &[ProductionRecord],
    metrics: &[MachineMetric],
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sequence: Option<u32>,
) -> ReportPayload {
    let machines = machine_refs(records);

    let achievement_no = match (sequence, date_to.or(date_from)) {
        (Some(seq), Some(date)) => Some(achievement_number(seq, date)),
        _ => None,
    };

    let line_name = records
        .first()
        .map(|r| first_word(&r.machine))
        .filter(|w| !w.is_empty())
        .unwrap_or(DEFAULT_LINE_NAME)
        .to_string();

    let rows: Vec<ReportRow> = records
        .iter()
        .map(|r| {
            let machine_loading = machines
                .iter()
                .map(|m| {
                    let hours = if m.name == r.machine { r.actual_time_hours } else { 0.0 };
                    (m.name.clone(), hours)
                })
                .collect();
            ReportRow {
                part_name: r.part_name.clone(),
                part_no: r.part_number.clone(),
                id_proses: None,
                process: r.process.clone(),
                id_mesin: None,
                machine: r.machine.clone(),
                group_line: r.group_line.clone(),
                sph: None,
                qty_spk: r.quantity_planned,
                qty_prod: r.quantity_produced,
                act_time: r.actual_time_hours,
                sph_act: sph_actual(r.quantity_produced, r.actual_time_hours) as f64,
                cycle_time: cycle_time_seconds(r.actual_time_hours, r.quantity_produced),
                dandori: None,
                need_time: r.actual_time_hours,
                performance_score: r.performance_score,
                machine_loading,
                kode_problem: String::new(),
            }
        })
        .collect();

    let chart_data = ChartData {
        labels: metrics
            .iter()
            .map(|m| {
                machines
                    .iter()
                    .find(|mc| mc.name == m.machine_name)
                    .map(|mc| mc.short_name.clone())
                    .unwrap_or_else(|| m.machine_name.clone())
            })
            .collect(),
        values: metrics.iter().map(|m| m.average_performance).collect(),
    };

    let mut capacity_used_hours: BTreeMap<String, f64> = BTreeMap::new();
    for m in &machines {
        let total: f64 = records
            .iter()
            .filter(|r| r.machine == m.name)
            .map(|r| r.actual_time_hours)
            .sum();
        capacity_used_hours.insert(m.name.clone(), total);
    }

    let summary = ReportSummary {
        capacity_used_hours,
        machine_performance: metrics
            .iter()
            .map(|m| MachinePerformance {
                machine: m.machine_name.clone(),
                avg_performance: m.average_performance,
            })
            .collect(),
    };

    debug!(rows = rows.len(), machines = machines.len(), "报表载荷预备完成");

    ReportPayload {
        header: ReportHeader {
            date_from: date_from.map(|d| d.to_string()).unwrap_or_default(),
            date_to: date_to.map(|d| d.to_string()).unwrap_or_default(),
            achievement_no,
            line_name: Some(line_name),
            group_line_filter: Vec::new(),
        },
        records: rows,
        machines,
        chart_data: Some(chart_data),
        summary: Some(summary),
    }
}

// ==========================================
// 产线
// ==========================================

/// 提取可选产线
///
/// 优先使用 `groupLines`；缺失或为空时从零件的单字符 `groupLine` 提取。
/// 统一去空白、转大写、仅保留单个 A-Z 字母，排序去重。
pub fn extract_group_lines(data: &DropdownData) -> Vec<GroupLine> {
    let raw: Vec<String> = if data.group_lines.is_empty() {
        data.parts
            .iter()
            .map(|p| p.group_line.clone())
            .filter(|g| g.chars().count() == 1)
            .collect()
    } else {
        data.group_lines.iter().map(lenient::value_to_string).collect()
    };

    raw.iter()
        .filter_map(|s| GroupLine::parse(s))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 产线记录数估算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum LineEstimate {
    Known(usize),
    /// 估算请求失败
    Unknown,
}

impl std::fmt::Display for LineEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineEstimate::Known(n) => write!(f, "{}", n),
            LineEstimate::Unknown => write!(f, "?"),
        }
    }
}

/// 产线选项（复选框状态）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineOption {
    pub line: GroupLine,
    pub descriptor: LineDescriptor,
    pub estimate: Option<LineEstimate>,
}

impl LineOption {
    /// 估算为 0 条时禁用
    pub fn enabled(&self) -> bool {
        !matches!(self.estimate, Some(LineEstimate::Known(0)))
    }
}

/// 按产线统计记录数（每条可选产线初始为 0）
pub fn estimate_records_per_line(
    lines: &[GroupLine],
    records: &[ProductionRecord],
) -> BTreeMap<GroupLine, usize> {
    let mut counts: BTreeMap<GroupLine, usize> = lines.iter().map(|l| (*l, 0)).collect();
    for r in records {
        if let Some(count) = r.line().and_then(|l| counts.get_mut(&l)) {
            *count += 1;
        }
    }
    counts
}

/// 日期跨度天数（含首尾）
pub fn date_range_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().abs() + 1
}

// ==========================================
// 选择预览
// ==========================================

/// 版面提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutHint {
    Standard,
    /// 超过单页最佳记录数
    Compressed,
    /// 超过单页最佳记录数的两倍
    MultiPage,
}

impl LayoutHint {
    pub fn for_records(total: usize, optimal_per_page: usize) -> Self {
        if total > optimal_per_page * 2 {
            LayoutHint::MultiPage
        } else if total > optimal_per_page {
            LayoutHint::Compressed
        } else {
            LayoutHint::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPreview {
    pub range_days: i64,
    pub selected_lines: Vec<GroupLine>,
    /// 估算总数（任一已选产线估算未知时为 None）
    pub estimated_total: Option<usize>,
    pub layout: Option<LayoutHint>,
    /// 已选产线超过上限
    pub too_many_lines: bool,
}

/// 构建选择预览；日期缺失、起止倒置或未选产线时无预览
pub fn selection_preview(
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    selected: &[GroupLine],
    options: &[LineOption],
    max_lines: usize,
    optimal_per_page: usize,
) -> Option<SelectionPreview> {
    let (from, to) = (date_from?, date_to?);
    if selected.is_empty() || from > to {
        return None;
    }

    let estimated_total = selected.iter().try_fold(0usize, |acc, line| {
        match options.iter().find(|o| o.line == *line).and_then(|o| o.estimate) {
            Some(LineEstimate::Known(n)) => Some(acc + n),
            Some(LineEstimate::Unknown) => None,
            None => Some(acc),
        }
    });

    Some(SelectionPreview {
        range_days: date_range_days(from, to),
        selected_lines: selected.to_vec(),
        estimated_total,
        layout: estimated_total.map(|t| LayoutHint::for_records(t, optimal_per_page)),
        too_many_lines: selected.len() > max_lines,
    })
}

// ==========================================
// 报表页：按产线过滤机台与图表
// ==========================================

/// 记录中出现的产线（去空白、转大写、去重）
fn active_lines(records: &[ReportRow]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r.group_line.trim().to_uppercase())
        .filter(|g| !g.is_empty())
        .collect()
}

fn prefix_of(label: &str) -> String {
    label
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

/// 仅保留简称首字母属于记录产线的机台
///
/// - 无机台 → 空
/// - 无记录或记录无产线 → 全部机台
pub fn filter_machines_by_lines(machines: &[MachineRef], records: &[ReportRow]) -> Vec<MachineRef> {
    if machines.is_empty() {
        return Vec::new();
    }
    let lines = active_lines(records);
    if lines.is_empty() {
        return machines.to_vec();
    }
    machines
        .iter()
        .filter(|m| lines.contains(&prefix_of(m.display_name())))
        .cloned()
        .collect()
}

/// 图表标签首字母按记录产线过滤（记录无产线时保留全部）
pub fn filter_chart_by_lines(chart: &ChartData, records: &[ReportRow]) -> ChartData {
    let lines = active_lines(records);
    if lines.is_empty() {
        return chart.clone();
    }
    let (labels, values) = chart
        .labels
        .iter()
        .zip(chart.values.iter())
        .filter(|(label, _)| lines.contains(&prefix_of(label)))
        .map(|(l, v)| (l.clone(), *v))
        .unzip();
    ChartData { labels, values }
}

/// 每行的机台负荷单元（按可见机台顺序，0 负荷为 None）
pub fn loading_cells(row: &ReportRow, machines: &[MachineRef]) -> Vec<Option<f64>> {
    machines
        .iter()
        .map(|m| Some(row.loading_for(&m.name)).filter(|v| *v > 0.0))
        .collect()
}

/// 汇总：已用产能（可见机台，展示名 → 小时）
pub fn visible_capacity(summary: &ReportSummary, machines: &[MachineRef]) -> Vec<(String, f64)> {
    machines
        .iter()
        .map(|m| {
            let hours = summary.capacity_used_hours.get(&m.name).copied().unwrap_or(0.0);
            (m.display_name().to_string(), hours)
        })
        .collect()
}

/// 汇总：机台绩效（仅可见机台）
pub fn visible_performance(summary: &ReportSummary, machines: &[MachineRef]) -> Vec<(String, f64)> {
    summary
        .machine_performance
        .iter()
        .filter_map(|p| {
            machines
                .iter()
                .find(|m| m.name == p.machine)
                .map(|m| (m.display_name().to_string(), p.avg_performance))
        })
        .collect()
}

// ==========================================
// 报表表头展示
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDisplay {
    pub date_display: String,
    pub achievement_no: String,
    pub filtered_lines: String,
    pub line_label: String,
}

/// 表头展示文本
///
/// - 同一天: `Monday, 05 January 2026`；跨日: `05 Jan - 06 Jan 2026`
/// - 有产线筛选: `LINE A + B | n Records`；否则 `ALL PRODUCTION LINES`
pub fn header_display(header: &ReportHeader, record_count: usize) -> HeaderDisplay {
    let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
    let date_display = match (parse(&header.date_from), parse(&header.date_to)) {
        (Some(from), Some(to)) if from == to => from.format("%A, %d %B %Y").to_string(),
        (Some(from), Some(to)) => format!("{} - {}", from.format("%d %b"), to.format("%d %b %Y")),
        _ if header.date_from == header.date_to => header.date_from.clone(),
        _ => format!("{} - {}", header.date_from, header.date_to),
    };

    let (filtered_lines, line_label) = if header.group_line_filter.is_empty() {
        ("ALL LINES".to_string(), "ALL PRODUCTION LINES".to_string())
    } else {
        (
            header.group_line_filter.join(", "),
            format!(
                "LINE {} | {} Records",
                header.group_line_filter.join(" + "),
                record_count
            ),
        )
    };

    HeaderDisplay {
        date_display,
        achievement_no: header
            .achievement_no
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "-".to_string()),
        filtered_lines,
        line_label,
    }
}

// ==========================================
// 导出
// ==========================================

/// PDF 文件名：`Production_Report_{from}_to_{to}_Line_{A-B|ALL}.pdf`
pub fn pdf_filename(date_from: &str, date_to: &str, lines: &[GroupLine]) -> String {
    let line_part = if lines.is_empty() {
        "ALL".to_string()
    } else {
        lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join("-")
    };
    format!(
        "Production_Report_{}_to_{}_Line_{}.pdf",
        date_from, date_to, line_part
    )
}

/// 快照在 A4 横向页面上的放置（mm）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFit {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 按宽度铺满；超高时按高度缩放并水平居中，否则垂直居中
pub fn fit_a4_landscape(canvas_width: f64, canvas_height: f64) -> Option<PageFit> {
    if !(canvas_width > 0.0 && canvas_height > 0.0) {
        return None;
    }
    let img_height = canvas_height * A4_LANDSCAPE_WIDTH_MM / canvas_width;
    if img_height > A4_LANDSCAPE_HEIGHT_MM {
        let scale = A4_LANDSCAPE_HEIGHT_MM / img_height;
        let width = A4_LANDSCAPE_WIDTH_MM * scale;
        Some(PageFit {
            x: (A4_LANDSCAPE_WIDTH_MM - width) / 2.0,
            y: 0.0,
            width,
            height: A4_LANDSCAPE_HEIGHT_MM,
        })
    } else {
        Some(PageFit {
            x: 0.0,
            y: (A4_LANDSCAPE_HEIGHT_MM - img_height) / 2.0,
            width: A4_LANDSCAPE_WIDTH_MM,
            height: img_height,
        })
    }
}
