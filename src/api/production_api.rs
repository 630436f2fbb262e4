// ==========================================
// 生产追踪系统 - 实绩录入 API
// ==========================================
// 职责: 录入主数据加载、零件/工序检索、工时换算、实绩提交
// 红线: 主数据加载失败时只允许重试；校验失败不发请求
// ==========================================

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult, ValidationRule};
use crate::api::validator::{validate_production, ProductionForm};
use crate::domain::master::DropdownData;
use crate::domain::production::{SubmitAlert, SubmitMetrics};
use crate::engine::autocomplete::{processes_for_part, search_part_names, search_processes};
use crate::engine::formulas::{minutes_to_hours_preview, DurationBreakdown};
use crate::loader::RecordLoader;
use crate::perf::PerfGuard;

/// 提交结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub metrics: SubmitMetrics,
    pub alerts: Vec<SubmitAlert>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductionSession {
    /// None 表示主数据未就绪
    pub master: Option<DropdownData>,
    pub selected_part: Option<String>,
    pub selected_process: Option<String>,
}

pub struct ProductionInputApi {
    loader: RecordLoader,
    session: ProductionSession,
}

impl ProductionInputApi {
    pub fn new(loader: RecordLoader) -> Self {
        Self {
            loader,
            session: ProductionSession::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.session.master.is_some()
    }

    pub fn session(&self) -> &ProductionSession {
        &self.session
    }

    fn master(&self) -> ApiResult<&DropdownData> {
        self.session
            .master
            .as_ref()
            .ok_or_else(|| ApiError::NotReady("getDropdowns".to_string()))
    }

    /// 加载录入主数据（`parts` 与 `machines` 缺一即失败）
    #[instrument(skip(self))]
    pub async fn load_master(&mut self) -> ApiResult<&DropdownData> {
        let _perf = PerfGuard::new("production_input_load_master");
        match self.loader.load_production_master().await {
            Ok(data) => {
                self.session = ProductionSession {
                    master: Some(data),
                    ..ProductionSession::default()
                };
                self.master()
            }
            Err(e) => {
                warn!(error = %e, "录入主数据加载失败，仅允许重试");
                self.session = ProductionSession::default();
                Err(e.into())
            }
        }
    }

    /// 机台列表
    pub fn machines(&self) -> ApiResult<&[String]> {
        Ok(&self.master()?.machines)
    }

    /// 零件名检索（去重，保持首次出现顺序）
    pub fn search_parts(&self, term: &str) -> ApiResult<Vec<String>> {
        let master = self.master()?;
        Ok(search_part_names(&master.parts, term)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// 选择零件：加载其工序并清空已选工序
    pub fn select_part(&mut self, part_name: &str) -> ApiResult<Vec<String>> {
        let processes: Vec<String> = processes_for_part(&self.master()?.parts, part_name)
            .into_iter()
            .map(|p| p.process.clone())
            .collect();
        if processes.is_empty() {
            return Err(ApiError::validation("part_name", ValidationRule::NotInList));
        }
        self.session.selected_part = Some(part_name.to_string());
        self.session.selected_process = None;
        Ok(processes)
    }

    /// 清空零件（工序随之禁用）
    pub fn clear_part(&mut self) {
        self.session.selected_part = None;
        self.session.selected_process = None;
    }

    /// 是否可选择工序
    pub fn process_enabled(&self) -> bool {
        self.session.selected_part.is_some()
    }

    /// 在已选零件的工序中检索；未选零件时为空
    pub fn search_processes(&self, term: &str) -> Vec<String> {
        let (Some(master), Some(part)) = (&self.session.master, &self.session.selected_part) else {
            return Vec::new();
        };
        let processes = processes_for_part(&master.parts, part);
        search_processes(&processes, term)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 选择工序
    pub fn select_process(&mut self, process: &str) -> ApiResult<()> {
        if !self.search_processes("").iter().any(|p| p == process) {
            return Err(ApiError::validation("process", ValidationRule::NotInList));
        }
        self.session.selected_process = Some(process.to_string());
        Ok(())
    }

    /// 分钟 → 小时提示
    pub fn hours_preview(&self, minutes: i64) -> DurationBreakdown {
        minutes_to_hours_preview(minutes)
    }

    /// 提交实绩
    #[instrument(skip(self, form), fields(part = %form.part_name))]
    pub async fn submit(&mut self, form: &ProductionForm) -> ApiResult<SubmitOutcome> {
        let entry = validate_production(form, &self.master()?.parts)?;

        let _perf = PerfGuard::new("production_input_submit");
        let metrics = self.loader.submit_production(&entry).await?;
        let alerts = metrics.alerts();
        info!(?alerts, "实绩提交完成");

        self.clear_part();
        Ok(SubmitOutcome { metrics, alerts })
    }
}
