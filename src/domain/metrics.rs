// ==========================================
// 生产追踪系统 - 派生指标
// ==========================================
// 职责: 机台指标、日均绩效、绩效分布、看板汇总
// 生命周期: 每次筛选变更时重新计算，不做原地修改，不持久化
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::PerformanceCategory;

// ==========================================
// MachineMetric - 机台指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineMetric {
    pub machine_name: String,
    pub record_count: usize,
    pub average_performance: f64,
    pub average_quantity_achievement: f64,
    pub average_efficiency_achievement: f64,
    pub total_quantity_produced: u64,
}

impl MachineMetric {
    /// 按平均绩效分级
    pub fn category(&self) -> PerformanceCategory {
        PerformanceCategory::from_score(self.average_performance)
    }
}

/// 日均绩效点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPerformance {
    pub date: NaiveDate,
    pub average_performance: f64,
}

// ==========================================
// PerformanceDistribution - 绩效分布
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceDistribution {
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
}

impl PerformanceDistribution {
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.poor
    }

    pub fn count(&self, category: PerformanceCategory) -> usize {
        match category {
            PerformanceCategory::Excellent => self.excellent,
            PerformanceCategory::Good => self.good,
            PerformanceCategory::Poor => self.poor,
        }
    }

    /// 某一分级占比 (%)，总数为 0 时为 None
    pub fn share_percent(&self, category: PerformanceCategory) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.count(category) as f64 * 100.0 / total as f64)
    }
}

// ==========================================
// DashboardSummary - 看板汇总卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// 筛选后记录数
    pub total_records: usize,
    /// 各机台平均绩效的平均值（无机台时为 None，展示为 N/A）
    pub overall_average: Option<f64>,
    /// 平均绩效最高的机台
    pub best_machine: Option<MachineScore>,
    /// 平均绩效最低的机台
    pub worst_machine: Option<MachineScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineScore {
    pub machine_name: String,
    pub average_performance: f64,
}

/// 百分比展示（1 位小数），缺失时为 N/A
pub fn format_percent_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}%", v),
        _ => "N/A".to_string(),
    }
}
