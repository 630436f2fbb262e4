// ==========================================
// 生产追踪系统 - 换模 (Dandori) 记录
// ==========================================
// 职责: 换模活动明细、换模录入载荷、换模状态
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 换模活动明细行（损失代码 + 分钟）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DandoriActivity {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "menit")]
    pub minutes: u32,
}

/// 换模录入载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DandoriEntry {
    pub tanggal: NaiveDate,
    pub shift: String,
    pub operator: String,
    pub nama_mesin: String,
    pub line: String,
    pub part_no: String,
    pub part_name: String,
    pub id_proses: String,
    pub nama_proses: String,
    pub standard_time: f64,
    pub rincian_detail: Vec<DandoriActivity>,
}

impl DandoriEntry {
    /// 实际换模总分钟数
    pub fn total_minutes(&self) -> u32 {
        self.rincian_detail.iter().map(|a| a.minutes).sum()
    }
}

/// 换模状态（实际 vs 标准）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DandoriStatus {
    /// 标准或实际缺失
    Pending,
    /// 在标准时间内
    Ok,
    /// 超出标准（超出分钟数）
    Over { excess_minutes: f64 },
}

impl std::fmt::Display for DandoriStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DandoriStatus::Pending => write!(f, "-"),
            DandoriStatus::Ok => write!(f, "OK"),
            DandoriStatus::Over { excess_minutes } => write!(f, "OVER +{}", excess_minutes),
        }
    }
}
