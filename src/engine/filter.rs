// ==========================================
// 生产追踪系统 - 筛选引擎
// ==========================================
// 职责: 按日期范围/机台/零件/产线筛选生产实绩
// 红线: 纯函数；结果保持输入顺序（稳定子序列）
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::domain::production::ProductionRecord;
use crate::domain::types::GroupLine;

// ==========================================
// FilterCriteria - 筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// 起始日（含，当日 00:00:00）
    pub date_from: Option<NaiveDate>,
    /// 截止日（含，延伸到当日 23:59:59.999）
    pub date_to: Option<NaiveDate>,
    pub machine: Option<String>,
    pub part_name: Option<String>,
    pub part_number: Option<String>,
    #[serde(default)]
    pub group_lines: Vec<GroupLine>,
}

impl FilterCriteria {
    /// 仅日期范围
    pub fn date_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        }
    }

    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    pub fn with_part_name(mut self, part_name: impl Into<String>) -> Self {
        self.part_name = Some(part_name.into());
        self
    }

    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    pub fn with_group_lines(mut self, lines: impl IntoIterator<Item = GroupLine>) -> Self {
        self.group_lines = lines.into_iter().collect();
        self
    }

    /// 是否设置了日期边界
    pub fn has_date_bound(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// 是否没有任何生效条件
    pub fn is_empty(&self) -> bool {
        !self.has_date_bound()
            && active(&self.machine).is_none()
            && active(&self.part_name).is_none()
            && active(&self.part_number).is_none()
            && self.group_lines.is_empty()
    }

    fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.date_from.map(|d| d.and_time(NaiveTime::MIN))
    }

    fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.date_to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }
}

/// 空串视为未设置
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// 筛选生产实绩
///
/// 规则:
/// - 日期: 早于起始日 00:00 或晚于截止日 23:59:59.999 的记录排除；
///   设置任一边界时，日期无法解析的记录排除
/// - 机台/零件名/零件号: 条件非空时精确匹配（区分大小写）
/// - 产线: 集合非空时，记录产线必须在集合内
pub fn filter_records(records: &[ProductionRecord], criteria: &FilterCriteria) -> Vec<ProductionRecord> {
    let lower = criteria.lower_bound();
    let upper = criteria.upper_bound();
    let bounded = criteria.has_date_bound();
    let machine = active(&criteria.machine);
    let part_name = active(&criteria.part_name);
    let part_number = active(&criteria.part_number);
    let lines: HashSet<GroupLine> = criteria.group_lines.iter().copied().collect();

    let result: Vec<ProductionRecord> = records
        .iter()
        .filter(|r| {
            if bounded {
                let Some(dt) = r.date_time() else {
                    return false;
                };
                if lower.is_some_and(|lo| dt < lo) || upper.is_some_and(|hi| dt > hi) {
                    return false;
                }
            }
            if machine.is_some_and(|m| r.machine != m) {
                return false;
            }
            if part_name.is_some_and(|p| r.part_name != p) {
                return false;
            }
            if part_number.is_some_and(|p| r.part_number != p) {
                return false;
            }
            if !lines.is_empty() && !r.line().is_some_and(|l| lines.contains(&l)) {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    debug!(input = records.len(), output = result.len(), "筛选完成");
    result
}

/// 提取去重排序后的非空取值（下拉选项）
pub fn distinct_sorted<F>(records: &[ProductionRecord], selector: F) -> Vec<String>
where
    F: Fn(&ProductionRecord) -> &str,
{
    records
        .iter()
        .map(|r| selector(r))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 最新的可解析记录日期
pub fn latest_record_date(records: &[ProductionRecord]) -> Option<NaiveDate> {
    records.iter().filter_map(|r| r.calendar_date()).max()
}
