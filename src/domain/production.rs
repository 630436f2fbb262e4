// ==========================================
// 生产追踪系统 - 生产实绩实体
// ==========================================
// 职责: 生产实绩记录（看板/报表数据源）、实绩录入载荷、录入结果指标
// 字段命名: Rust 侧使用语义名，serde 映射表格 API 的原始键
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;
use crate::domain::types::GroupLine;

// ==========================================
// ProductionRecord - 生产实绩记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 生产日期（原始文本，按需解析）
    #[serde(deserialize_with = "lenient::string_or_empty", default)]
    pub date: String,

    /// 机台
    #[serde(rename = "mesin", deserialize_with = "lenient::string_or_empty", default)]
    pub machine: String,

    /// 零件名称
    #[serde(rename = "partName", deserialize_with = "lenient::string_or_empty", default)]
    pub part_name: String,

    /// 零件号
    #[serde(rename = "partNo", deserialize_with = "lenient::string_or_empty", default)]
    pub part_number: String,

    /// 工序
    #[serde(rename = "proses", deserialize_with = "lenient::string_or_empty", default)]
    pub process: String,

    /// 计划数量 (SPK)
    #[serde(rename = "qtySpk", deserialize_with = "lenient::quantity", default)]
    pub quantity_planned: u64,

    /// 实际产量
    #[serde(rename = "qtyProd", deserialize_with = "lenient::quantity", default)]
    pub quantity_produced: u64,

    /// 实际工时（小时）
    #[serde(rename = "actTime", deserialize_with = "lenient::f64_or_zero", default)]
    pub actual_time_hours: f64,

    /// 综合绩效分
    #[serde(rename = "performanceScore", deserialize_with = "lenient::f64_or_zero", default)]
    pub performance_score: f64,

    /// 数量达成率 (%)
    #[serde(rename = "achievementQty", deserialize_with = "lenient::f64_or_zero", default)]
    pub quantity_achievement_percent: f64,

    /// 效率达成率 (%)
    #[serde(rename = "achievementEff", deserialize_with = "lenient::f64_or_zero", default)]
    pub efficiency_achievement_percent: f64,

    /// 产线代码（原始文本）
    #[serde(rename = "groupLine", deserialize_with = "lenient::string_or_empty", default)]
    pub group_line: String,
}

impl ProductionRecord {
    /// 解析生产日期时间
    ///
    /// 支持:
    /// - `YYYY-MM-DD`（当日 00:00）
    /// - RFC 3339（`2026-01-05T00:00:00.000Z`，取 UTC 时刻）
    /// - `YYYY-MM-DDTHH:MM:SS[.fff]` / `YYYY-MM-DD HH:MM:SS`
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        parse_record_date(&self.date)
    }

    /// 生产日期（日历日）
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date_time().map(|dt| dt.date())
    }

    /// 产线代码（无效时为 None）
    pub fn line(&self) -> Option<GroupLine> {
        GroupLine::parse(&self.group_line)
    }
}

/// 解析记录日期文本
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    None
}

// ==========================================
// ProductionEntry - 实绩录入载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEntry {
    #[serde(rename = "tglProduksi")]
    pub production_date: NaiveDate,
    #[serde(rename = "partName")]
    pub part_name: String,
    #[serde(rename = "proses")]
    pub process: String,
    #[serde(rename = "mesinAktual")]
    pub machine: String,
    #[serde(rename = "qtySpk")]
    pub quantity_planned: u64,
    #[serde(rename = "actQty")]
    pub quantity_produced: u64,
    #[serde(rename = "actMenit")]
    pub actual_minutes: i64,
}

// ==========================================
// SubmitMetrics - 录入后服务端回传的指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitMetrics {
    #[serde(rename = "performanceScore", deserialize_with = "lenient::f64_or_zero", default)]
    pub performance_score: f64,
    #[serde(rename = "achievementQty", deserialize_with = "lenient::f64_or_zero", default)]
    pub quantity_achievement_percent: f64,
    #[serde(rename = "achievementEff", deserialize_with = "lenient::f64_or_zero", default)]
    pub efficiency_achievement_percent: f64,
    /// 实际 SPH（件/小时）
    #[serde(rename = "sphAct", alias = "sph", deserialize_with = "lenient::f64_or_zero", default)]
    pub sph_actual: f64,
    #[serde(default)]
    pub overproduction: bool,
    #[serde(default)]
    pub delayed: bool,
}

/// 录入结果提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAlert {
    /// 产量超过 SPK 目标
    Overproduction,
    /// 工时长于标准
    Delayed,
    /// 达成目标
    Optimal,
}

impl SubmitMetrics {
    pub fn alerts(&self) -> Vec<SubmitAlert> {
        let mut alerts = Vec::new();
        if self.overproduction {
            alerts.push(SubmitAlert::Overproduction);
        }
        if self.delayed {
            alerts.push(SubmitAlert::Delayed);
        }
        if alerts.is_empty() {
            alerts.push(SubmitAlert::Optimal);
        }
        alerts
    }
}
