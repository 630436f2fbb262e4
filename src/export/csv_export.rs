// ==========================================
// 生产追踪系统 - 机台指标 CSV 导出
// ==========================================
// 职责: MachineMetric → CSV（表头与状态文字为固定英文）
// 工具: csv crate
// ==========================================

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::metrics::MachineMetric;
use crate::export::error::{ExportError, ExportResult};

/// CSV 表头
pub const CSV_HEADER: [&str; 7] = [
    "Mesin",
    "Total Records",
    "Avg Performance (%)",
    "Avg Qty Achievement (%)",
    "Avg Eff Achievement (%)",
    "Total Qty Produced",
    "Status",
];

/// 导出文件名
pub fn csv_filename(date_from: &str, date_to: &str) -> String {
    format!("performance_report_{}_to_{}.csv", date_from, date_to)
}

/// 单行字段
pub fn metric_row(metric: &MachineMetric) -> [String; 7] {
    [
        metric.machine_name.clone(),
        metric.record_count.to_string(),
        format!("{:.1}", metric.average_performance),
        format!("{:.1}", metric.average_quantity_achievement),
        format!("{:.1}", metric.average_efficiency_achievement),
        metric.total_quantity_produced.to_string(),
        metric.category().status_label().to_string(),
    ]
}

/// 写出 CSV（空指标视为无数据）
pub fn write_metrics_csv<W: Write>(writer: W, metrics: &[MachineMetric]) -> ExportResult<()> {
    if metrics.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for metric in metrics {
        csv_writer.write_record(metric_row(metric))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// 生成 CSV 文本
pub fn metrics_to_csv_string(metrics: &[MachineMetric]) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_metrics_csv(&mut buffer, metrics)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// 导出到目录，返回文件路径
pub fn export_metrics_csv(
    dir: &Path,
    metrics: &[MachineMetric],
    date_from: &str,
    date_to: &str,
) -> ExportResult<PathBuf> {
    let content = metrics_to_csv_string(metrics)?;
    let path = dir.join(csv_filename(date_from, date_to));
    std::fs::write(&path, content).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), rows = metrics.len(), "CSV 导出完成");
    Ok(path)
}
