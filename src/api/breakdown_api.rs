// ==========================================
// 生产追踪系统 - 模具故障 API
// ==========================================
// 职责: 模具主数据与单号计数加载、模具检索、单号/时长预览、故障提交
// 红线: 校验失败不发请求
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_breakdown;
use crate::domain::breakdown::{BreakdownEntry, BreakdownReceipt};
use crate::domain::master::{LkdCounter, MasterDies};
use crate::domain::types::BreakdownSeverity;
use crate::engine::autocomplete::{find_dies_exact, search_dies};
use crate::engine::document_number::lkd_number_preview;
use crate::engine::formulas::classify_severity;
use crate::loader::RecordLoader;
use crate::perf::PerfGuard;

/// 时长预览
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationPreview {
    pub hours: f64,
    pub severity: BreakdownSeverity,
}

impl DurationPreview {
    /// 日期+时刻已完整，不做跨夜补偿；结束早于开始时不显示
    fn between(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        let minutes = (end - start).num_minutes();
        if minutes < 0 {
            return None;
        }
        let hours = minutes as f64 / 60.0;
        Some(Self {
            hours,
            severity: classify_severity(hours),
        })
    }
}

/// 故障时刻输入（任一缺失则对应预览不显示）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreakdownTimes {
    pub breakdown_date: Option<NaiveDate>,
    pub breakdown_time: Option<NaiveTime>,
    pub repair_start_date: Option<NaiveDate>,
    pub repair_start_time: Option<NaiveTime>,
    pub repair_end_date: Option<NaiveDate>,
    pub repair_end_time: Option<NaiveTime>,
}

fn join(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<NaiveDateTime> {
    Some(NaiveDateTime::new(date?, time?))
}

/// 维修时长与停机时长预览
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BreakdownDurations {
    /// 维修开始 → 维修结束
    pub repair: Option<DurationPreview>,
    /// 故障发生 → 维修结束
    pub downtime: Option<DurationPreview>,
}

/// 维修起止不完整或结束不晚于开始时整体不显示（与提交校验一致）
pub fn duration_preview(times: &BreakdownTimes) -> BreakdownDurations {
    let (Some(repair_start), Some(repair_end)) = (
        join(times.repair_start_date, times.repair_start_time),
        join(times.repair_end_date, times.repair_end_time),
    ) else {
        return BreakdownDurations::default();
    };
    if repair_end <= repair_start {
        return BreakdownDurations::default();
    }
    BreakdownDurations {
        repair: DurationPreview::between(repair_start, repair_end),
        downtime: join(times.breakdown_date, times.breakdown_time)
            .and_then(|start| DurationPreview::between(start, repair_end)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct BreakdownSession {
    /// None 表示模具主数据未就绪
    pub dies: Option<Vec<MasterDies>>,
    pub counter: LkdCounter,
    pub selected: Option<MasterDies>,
}

pub struct BreakdownApi {
    loader: RecordLoader,
    search_limit: usize,
    session: BreakdownSession,
}

impl BreakdownApi {
    pub fn new(loader: RecordLoader, search_limit: usize) -> Self {
        Self {
            loader,
            search_limit,
            session: BreakdownSession::default(),
        }
    }

    pub fn session(&self) -> &BreakdownSession {
        &self.session
    }

    pub fn is_ready(&self) -> bool {
        self.session.dies.is_some()
    }

    fn dies(&self) -> ApiResult<&[MasterDies]> {
        self.session
            .dies
            .as_deref()
            .ok_or_else(|| ApiError::NotReady("getMasterDies".to_string()))
    }

    /// 加载模具主数据
    #[instrument(skip(self))]
    pub async fn load_master_dies(&mut self) -> ApiResult<usize> {
        let _perf = PerfGuard::new("breakdown_load_dies");
        match self.loader.load_master_dies().await {
            Ok(dies) => {
                let count = dies.len();
                self.session.dies = Some(dies);
                self.session.selected = None;
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "模具主数据加载失败，仅允许重试");
                self.session.dies = None;
                Err(e.into())
            }
        }
    }

    /// 加载单号计数；失败时保持默认建议编号 001
    #[instrument(skip(self))]
    pub async fn load_lkd_counter(&mut self) -> ApiResult<&LkdCounter> {
        match self.loader.load_lkd_counter().await {
            Ok(counter) => {
                self.session.counter = counter;
                Ok(&self.session.counter)
            }
            Err(e) => {
                warn!(error = %e, "故障单号计数加载失败，使用默认编号");
                self.session.counter = LkdCounter::default();
                Err(e.into())
            }
        }
    }

    /// 模具检索（空查询列出全部，结果受上限约束）
    pub fn search_dies(&self, query: &str) -> ApiResult<Vec<MasterDies>> {
        Ok(search_dies(self.dies()?, query, self.search_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 模具号输入：完全匹配（不区分大小写）时自动带出
    pub fn on_dies_input(&mut self, id: &str) -> ApiResult<Option<&MasterDies>> {
        let matched = find_dies_exact(self.dies()?, id).cloned();
        self.session.selected = matched;
        Ok(self.session.selected.as_ref())
    }

    /// 单号预览
    pub fn lkd_preview(&self, number: Option<&str>, breakdown_date: Option<NaiveDate>) -> String {
        lkd_number_preview(number, breakdown_date)
    }

    /// 时长预览
    pub fn duration_preview(&self, times: &BreakdownTimes) -> BreakdownDurations {
        duration_preview(times)
    }

    /// 提交故障记录，成功后刷新单号计数
    #[instrument(skip(self, entry), fields(id_dies = %entry.id_dies))]
    pub async fn submit(&mut self, entry: &BreakdownEntry) -> ApiResult<BreakdownReceipt> {
        validate_breakdown(entry, self.dies()?)?;

        let _perf = PerfGuard::new("breakdown_submit");
        let receipt = self.loader.submit_breakdown(entry).await?;
        info!(no_lkd = %receipt.no_lkd, "故障记录已保存");

        self.session.selected = None;
        if let Err(e) = self.load_lkd_counter().await {
            warn!(error = %e, "提交后刷新单号计数失败");
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn t(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, "%H:%M").ok()
    }

    #[test]
    fn test_duration_preview() {
        let times = BreakdownTimes {
            breakdown_date: d("2024-05-01"),
            breakdown_time: t("07:00"),
            repair_start_date: d("2024-05-01"),
            repair_start_time: t("08:00"),
            repair_end_date: d("2024-05-01"),
            repair_end_time: t("09:30"),
        };
        let preview = duration_preview(&times);
        let repair = preview.repair.unwrap();
        assert_eq!(repair.hours, 1.5);
        assert_eq!(repair.severity, BreakdownSeverity::Medium);
        let downtime = preview.downtime.unwrap();
        assert_eq!(downtime.hours, 2.5);
    }

    #[test]
    fn test_duration_preview_missing_inputs() {
        let times = BreakdownTimes {
            repair_start_date: d("2024-05-01"),
            repair_start_time: t("08:00"),
            ..BreakdownTimes::default()
        };
        assert_eq!(duration_preview(&times), BreakdownDurations::default());
    }

    #[test]
    fn test_duration_preview_hidden_when_negative_after_wrap() {
        let times = BreakdownTimes {
            repair_start_date: d("2024-05-03"),
            repair_start_time: t("08:00"),
            repair_end_date: d("2024-05-01"),
            repair_end_time: t("08:00"),
            ..BreakdownTimes::default()
        };
        assert!(duration_preview(&times).repair.is_none());
    }

    #[test]
    fn test_duration_preview_hidden_when_end_not_after_start() {
        let mut times = BreakdownTimes {
            breakdown_date: d("2024-05-01"),
            breakdown_time: t("07:00"),
            repair_start_date: d("2024-05-01"),
            repair_start_time: t("10:00"),
            repair_end_date: d("2024-05-01"),
            repair_end_time: t("08:00"),
        };
        // 同日结束早于开始: 不做跨夜补偿，预览与停机时长一起隐藏
        assert_eq!(duration_preview(&times), BreakdownDurations::default());

        times.repair_end_time = t("10:00");
        assert_eq!(duration_preview(&times), BreakdownDurations::default());
    }
}
