// ==========================================
// 生产追踪系统 - 生产报表载荷
// ==========================================
// 职责: 报表页面的数据结构（表头/明细/机台/图表/汇总）
// 来源: 看板页预备后经会话暂存交接，或由 getReportData 返回
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::lenient;

/// 报表载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub header: ReportHeader,
    #[serde(default)]
    pub records: Vec<ReportRow>,
    #[serde(default)]
    pub machines: Vec<MachineRef>,
    #[serde(default)]
    pub chart_data: Option<ChartData>,
    #[serde(default)]
    pub summary: Option<ReportSummary>,
}

/// 报表表头
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub date_from: String,
    pub date_to: String,
    /// 文档编号（未分配时为 None，展示为 "-"）
    #[serde(default)]
    pub achievement_no: Option<String>,
    #[serde(default)]
    pub line_name: Option<String>,
    /// 产线筛选（空 = 全部产线）
    #[serde(default)]
    pub group_line_filter: Vec<String>,
}

/// 报表明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "partName", deserialize_with = "lenient::string_or_empty", default)]
    pub part_name: String,
    #[serde(rename = "partNo", deserialize_with = "lenient::string_or_empty", default)]
    pub part_no: String,
    #[serde(rename = "idProses", deserialize_with = "lenient::optional_string", default)]
    pub id_proses: Option<String>,
    #[serde(rename = "proses", deserialize_with = "lenient::string_or_empty", default)]
    pub process: String,
    #[serde(rename = "idMesin", deserialize_with = "lenient::optional_string", default)]
    pub id_mesin: Option<String>,
    #[serde(rename = "mesin", deserialize_with = "lenient::string_or_empty", default)]
    pub machine: String,
    #[serde(rename = "groupLine", deserialize_with = "lenient::string_or_empty", default)]
    pub group_line: String,
    /// 标准 SPH（主数据未提供时为 None）
    #[serde(deserialize_with = "lenient::optional_f64", default)]
    pub sph: Option<f64>,
    #[serde(rename = "qtySpk", deserialize_with = "lenient::quantity", default)]
    pub qty_spk: u64,
    #[serde(rename = "qtyProd", deserialize_with = "lenient::quantity", default)]
    pub qty_prod: u64,
    #[serde(rename = "actTime", deserialize_with = "lenient::f64_or_zero", default)]
    pub act_time: f64,
    #[serde(rename = "sphAct", deserialize_with = "lenient::f64_or_zero", default)]
    pub sph_act: f64,
    #[serde(rename = "cycleTime", deserialize_with = "lenient::f64_or_zero", default)]
    pub cycle_time: f64,
    /// 换模时间（分钟，主数据未提供时为 None）
    #[serde(deserialize_with = "lenient::optional_f64", default)]
    pub dandori: Option<f64>,
    #[serde(rename = "needTime", deserialize_with = "lenient::f64_or_zero", default)]
    pub need_time: f64,
    #[serde(rename = "performanceScore", deserialize_with = "lenient::f64_or_zero", default)]
    pub performance_score: f64,
    /// 机台负荷（机台名 → 小时）
    #[serde(rename = "machineLoading", deserialize_with = "lenient::f64_map", default)]
    pub machine_loading: BTreeMap<String, f64>,
    #[serde(rename = "kodeProblem", deserialize_with = "lenient::string_or_empty", default)]
    pub kode_problem: String,
}

impl ReportRow {
    /// 工序时间 = 所需时间 + 换模时间
    pub fn process_time(&self) -> f64 {
        self.need_time + self.dandori.unwrap_or(0.0)
    }

    /// 实际 SPH（取整展示）
    pub fn sph_act_rounded(&self) -> i64 {
        self.sph_act.round() as i64
    }

    /// 指定机台负荷（无记录为 0）
    pub fn loading_for(&self, machine_name: &str) -> f64 {
        self.machine_loading
            .get(machine_name)
            .copied()
            .unwrap_or(0.0)
    }
}

/// 机台引用（全名 + 简称）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRef {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

impl MachineRef {
    /// 简称缺失时回退全名
    pub fn display_name(&self) -> &str {
        if self.short_name.is_empty() {
            &self.name
        } else {
            &self.short_name
        }
    }
}

/// 图表数据（标签与数值一一对应）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// 报表汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// 已用产能（机台名 → 小时）
    #[serde(rename = "kapasitasTerpakai", deserialize_with = "lenient::f64_map", default)]
    pub capacity_used_hours: BTreeMap<String, f64>,
    #[serde(default)]
    pub machine_performance: Vec<MachinePerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachinePerformance {
    pub machine: String,
    #[serde(deserialize_with = "lenient::f64_or_zero", default)]
    pub avg_performance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_payload_from_api() {
        let payload: ReportPayload = serde_json::from_value(json!({
            "header": { "dateFrom": "2026-01-05", "dateTo": "2026-01-06", "achievementNo": "12/STP/I/26" },
            "records": [{
                "partName": "Bracket", "partNo": "PN-1", "mesin": "P3 Press",
                "sph": 400, "qtyProd": "120", "actTime": 1.5, "sphAct": 79.6,
                "dandori": "15", "needTime": 1.5, "machineLoading": { "P3 Press": "1.5" }
            }],
            "machines": [{ "name": "P3 Press", "shortName": "P3" }]
        }))
        .unwrap();

        let row = &payload.records[0];
        assert_eq!(row.sph, Some(400.0));
        assert_eq!(row.qty_prod, 120);
        assert_eq!(row.process_time(), 16.5);
        assert_eq!(row.sph_act_rounded(), 80);
        assert_eq!(row.loading_for("P3 Press"), 1.5);
        assert_eq!(row.loading_for("A1"), 0.0);
        assert!(payload.summary.is_none());
        assert!(payload.header.group_line_filter.is_empty());
    }
}
