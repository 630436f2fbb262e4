// ==========================================
// 生产追踪系统 - 模具故障记录
// ==========================================
// 职责: 故障录入表单、提交结果
// 提交方式: 表单 POST (action=addBreakdown)
// ==========================================

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;

/// 故障录入表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub no_lkd_number: String,
    pub id_dies: String,
    pub nama_dies: String,
    pub id_proses: String,
    pub nama_proses: String,
    pub id_cust: String,
    pub tanggal_breakdown: NaiveDate,
    pub jam_breakdown: Option<NaiveTime>,
    pub tanggal_mulai_perbaikan: NaiveDate,
    pub jam_mulai_perbaikan: NaiveTime,
    pub tanggal_selesai_perbaikan: NaiveDate,
    pub jam_selesai_perbaikan: NaiveTime,
    pub problem_dies: String,
    pub penyebab_breakdown: String,
    pub tindakan_perbaikan: String,
    pub pic_maintenance: String,
}

fn fmt_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

impl BreakdownEntry {
    /// 转换为表单字段（顺序与提交一致，模具号转大写）
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("action", "addBreakdown".to_string()),
            ("no_lkd_number", self.no_lkd_number.trim().to_string()),
            ("id_dies", self.id_dies.trim().to_uppercase()),
            ("nama_dies", self.nama_dies.clone()),
            ("id_proses", self.id_proses.clone()),
            ("nama_proses", self.nama_proses.clone()),
            ("id_cust", self.id_cust.clone()),
            ("tanggal_breakdown", self.tanggal_breakdown.to_string()),
            (
                "jam_breakdown",
                self.jam_breakdown.map(fmt_time).unwrap_or_default(),
            ),
            (
                "tanggal_mulai_perbaikan",
                self.tanggal_mulai_perbaikan.to_string(),
            ),
            ("jam_mulai_perbaikan", fmt_time(self.jam_mulai_perbaikan)),
            (
                "tanggal_selesai_perbaikan",
                self.tanggal_selesai_perbaikan.to_string(),
            ),
            ("jam_selesai_perbaikan", fmt_time(self.jam_selesai_perbaikan)),
            ("problem_dies", self.problem_dies.clone()),
            ("penyebab_breakdown", self.penyebab_breakdown.clone()),
            ("tindakan_perbaikan", self.tindakan_perbaikan.clone()),
            ("pic_maintenance", self.pic_maintenance.clone()),
        ]
    }
}

/// 故障提交结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownReceipt {
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub no_lkd: String,
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub status_breakdown: String,
    /// 维修时长（小时）
    #[serde(deserialize_with = "lenient::f64_or_zero", default)]
    pub repair_time: f64,
    /// 总停机时长（小时）
    #[serde(deserialize_with = "lenient::f64_or_zero", default)]
    pub total_downtime: f64,
}
