// ==========================================
// 生产追踪系统 - 派生数值公式
// ==========================================
// 职责: SPH、节拍时间、时长（含跨夜）、故障严重度
// ==========================================

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::domain::types::BreakdownSeverity;

/// 一天的分钟数（跨夜补偿）
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// 实际 SPH（每小时产量，四舍五入；工时为 0 时为 0）
pub fn sph_actual(quantity_produced: u64, actual_time_hours: f64) -> u64 {
    if actual_time_hours > 0.0 {
        (quantity_produced as f64 / actual_time_hours).round() as u64
    } else {
        0
    }
}

/// 节拍时间（秒/件；产量为 0 时为 0）
pub fn cycle_time_seconds(actual_time_hours: f64, quantity_produced: u64) -> f64 {
    if quantity_produced > 0 {
        actual_time_hours * 3600.0 / quantity_produced as f64
    } else {
        0.0
    }
}

/// 班次时长（分钟）：结束早于开始视为跨夜
pub fn shift_duration_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let start_min = (start.hour() * 60 + start.minute()) as i64;
    let end_min = (end.hour() * 60 + end.minute()) as i64;
    wrap_overnight(end_min - start_min)
}

/// 日期+时刻之间的时长（分钟），负值按跨夜补偿
pub fn elapsed_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    wrap_overnight((end - start).num_minutes())
}

/// 日期+时刻之间的时长（小时）
pub fn elapsed_hours(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    elapsed_minutes(start, end) as f64 / 60.0
}

fn wrap_overnight(minutes: i64) -> i64 {
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// 故障/维修时长严重度
pub fn classify_severity(hours: f64) -> BreakdownSeverity {
    if hours < 1.0 {
        BreakdownSeverity::Light
    } else if hours < 3.0 {
        BreakdownSeverity::Medium
    } else {
        BreakdownSeverity::Heavy
    }
}

/// 分钟数拆分（录入界面提示用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationBreakdown {
    pub hours: i64,
    pub minutes: i64,
    /// 小时（2 位小数）
    pub decimal_hours: f64,
}

impl std::fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} h ({} h {} min)", self.decimal_hours, self.hours, self.minutes)
    }
}

/// 分钟 → (小时, 分钟, 小数小时)
pub fn minutes_to_hours_preview(total_minutes: i64) -> DurationBreakdown {
    let total = total_minutes.max(0);
    DurationBreakdown {
        hours: total / 60,
        minutes: total % 60,
        decimal_hours: (total as f64 / 60.0 * 100.0).round() / 100.0,
    }
}
