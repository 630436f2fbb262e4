// ==========================================
// 生产追踪系统 - 聚合引擎
// ==========================================
// 职责: 按机台/日期/绩效阈值聚合生产实绩
// 红线: 纯函数；每次筛选后从头重算，不做增量修改
// ==========================================

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::domain::metrics::{
    DailyPerformance, DashboardSummary, MachineMetric, MachineScore, PerformanceDistribution,
};
use crate::domain::production::ProductionRecord;
use crate::domain::types::PerformanceCategory;

#[derive(Default)]
struct MachineAccumulator {
    count: usize,
    performance: f64,
    quantity_achievement: f64,
    efficiency_achievement: f64,
    quantity_produced: u64,
}

/// 按机台聚合
///
/// 输出按平均绩效降序；绩效相同时保持机台首次出现的顺序
pub fn aggregate_by_machine(records: &[ProductionRecord]) -> Vec<MachineMetric> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, MachineAccumulator> = HashMap::new();

    for r in records {
        let acc = groups.entry(r.machine.as_str()).or_insert_with(|| {
            order.push(r.machine.as_str());
            MachineAccumulator::default()
        });
        acc.count += 1;
        acc.performance += r.performance_score;
        acc.quantity_achievement += r.quantity_achievement_percent;
        acc.efficiency_achievement += r.efficiency_achievement_percent;
        acc.quantity_produced += r.quantity_produced;
    }

    let mut metrics: Vec<MachineMetric> = order
        .into_iter()
        .filter_map(|name| {
            let acc = groups.get(name)?;
            // 分组至少含一条记录
            let n = acc.count as f64;
            Some(MachineMetric {
                machine_name: name.to_string(),
                record_count: acc.count,
                average_performance: acc.performance / n,
                average_quantity_achievement: acc.quantity_achievement / n,
                average_efficiency_achievement: acc.efficiency_achievement / n,
                total_quantity_produced: acc.quantity_produced,
            })
        })
        .collect();

    metrics.sort_by(|a, b| b.average_performance.total_cmp(&a.average_performance));

    debug!(records = records.len(), machines = metrics.len(), "机台聚合完成");
    metrics
}

/// 各机台平均绩效的平均值（无机台时为 None）
pub fn overall_average(metrics: &[MachineMetric]) -> Option<f64> {
    if metrics.is_empty() {
        return None;
    }
    let sum: f64 = metrics.iter().map(|m| m.average_performance).sum();
    Some(sum / metrics.len() as f64)
}

/// 按日历日聚合（升序，跳过日期无法解析的记录）
pub fn aggregate_by_date(records: &[ProductionRecord]) -> Vec<DailyPerformance> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for r in records {
        let Some(date) = r.calendar_date() else {
            continue;
        };
        let entry = days.entry(date).or_insert((0.0, 0));
        entry.0 += r.performance_score;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| DailyPerformance {
            date,
            average_performance: sum / count as f64,
        })
        .collect()
}

/// 按绩效阈值分布计数（逐条记录）
pub fn categorize_by_threshold(records: &[ProductionRecord]) -> PerformanceDistribution {
    categorize_scores(records.iter().map(|r| r.performance_score))
}

/// 按绩效阈值分布计数（任意分值序列）
pub fn categorize_scores(scores: impl IntoIterator<Item = f64>) -> PerformanceDistribution {
    let mut dist = PerformanceDistribution::default();
    for score in scores {
        match PerformanceCategory::from_score(score) {
            PerformanceCategory::Excellent => dist.excellent += 1,
            PerformanceCategory::Good => dist.good += 1,
            PerformanceCategory::Poor => dist.poor += 1,
        }
    }
    dist
}

/// 看板汇总卡片
///
/// 最佳/最差机台取已排序指标的首/尾
pub fn summarize(total_records: usize, metrics: &[MachineMetric]) -> DashboardSummary {
    let score = |m: &MachineMetric| MachineScore {
        machine_name: m.machine_name.clone(),
        average_performance: m.average_performance,
    };
    DashboardSummary {
        total_records,
        overall_average: overall_average(metrics),
        best_machine: metrics.first().map(score),
        worst_machine: metrics.last().map(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, machine: &str, score: f64, qty: u64) -> ProductionRecord {
        ProductionRecord {
            date: date.to_string(),
            machine: machine.to_string(),
            part_name: "Bracket".to_string(),
            part_number: "PN-1".to_string(),
            process: "Blank".to_string(),
            quantity_planned: 100,
            quantity_produced: qty,
            actual_time_hours: 1.0,
            performance_score: score,
            quantity_achievement_percent: score,
            efficiency_achievement_percent: score / 2.0,
            group_line: "P".to_string(),
        }
    }

    #[test]
    fn test_aggregate_by_machine_sorted_desc() {
        let records = vec![
            record("2026-01-05", "M2", 60.0, 10),
            record("2026-01-05", "M1", 95.0, 20),
            record("2026-01-06", "M2", 60.0, 5),
        ];
        let metrics = aggregate_by_machine(&records);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].machine_name, "M1");
        assert_eq!(metrics[1].machine_name, "M2");
        assert_eq!(metrics[1].record_count, 2);
        assert_eq!(metrics[1].total_quantity_produced, 15);
        assert_eq!(metrics[1].average_efficiency_achievement, 30.0);
    }

    #[test]
    fn test_aggregate_by_machine_ties_keep_first_seen() {
        let records = vec![
            record("2026-01-05", "B", 80.0, 1),
            record("2026-01-05", "A", 80.0, 1),
            record("2026-01-05", "C", 80.0, 1),
        ];
        let names: Vec<_> = aggregate_by_machine(&records)
            .into_iter()
            .map(|m| m.machine_name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_overall_average_empty_is_none() {
        assert_eq!(overall_average(&[]), None);
        let metrics = aggregate_by_machine(&[record("2026-01-05", "M1", 80.0, 1)]);
        assert_eq!(overall_average(&metrics), Some(80.0));
    }

    #[test]
    fn test_aggregate_by_date_ascending_skips_bad_dates() {
        let records = vec![
            record("2026-01-06", "M1", 80.0, 1),
            record("2026-01-05T08:00:00", "M1", 90.0, 1),
            record("2026-01-05", "M2", 70.0, 1),
            record("n/a", "M2", 10.0, 1),
        ];
        let days = aggregate_by_date(&records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2026-01-05");
        assert_eq!(days[0].average_performance, 80.0);
        assert_eq!(days[1].average_performance, 80.0);
    }

    #[test]
    fn test_categorize_by_threshold() {
        let records: Vec<_> = [95.0, 88.0, 40.0, 91.0]
            .iter()
            .map(|s| record("2026-01-05", "M1", *s, 1))
            .collect();
        let dist = categorize_by_threshold(&records);
        assert_eq!((dist.excellent, dist.good, dist.poor), (2, 1, 1));
    }

    #[test]
    fn test_summarize_best_and_worst() {
        let metrics = aggregate_by_machine(&[
            record("2026-01-05", "M2", 60.0, 1),
            record("2026-01-05", "M1", 95.0, 1),
        ]);
        let summary = summarize(2, &metrics);
        assert_eq!(summary.best_machine.unwrap().machine_name, "M1");
        assert_eq!(summary.worst_machine.unwrap().machine_name, "M2");
        assert_eq!(summary.overall_average, Some(77.5));

        let empty = summarize(0, &[]);
        assert!(empty.best_machine.is_none());
        assert!(empty.overall_average.is_none());
    }
}
