// ==========================================
// 生产追踪系统 - 换模 API
// ==========================================
// 职责: 换模主数据加载、零件检索、活动明细编辑、状态判定、换模提交
// ==========================================

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult, ValidationRule};
use crate::api::validator::validate_dandori;
use crate::domain::dandori::{DandoriEntry, DandoriStatus};
use crate::domain::master::{DandoriMaster, DandoriPart};
use crate::engine::autocomplete::search_dandori_parts;
use crate::engine::dandori::{dandori_status, ActivitySheet};
use crate::loader::RecordLoader;
use crate::perf::PerfGuard;

/// 换模表头（日期/班次/操作员/机台）
#[derive(Debug, Clone, PartialEq)]
pub struct DandoriHeader {
    pub tanggal: NaiveDate,
    pub shift: String,
    pub operator: String,
    pub nama_mesin: String,
}

#[derive(Debug, Clone, Default)]
pub struct DandoriSession {
    pub master: Option<DandoriMaster>,
    pub selected_part: Option<DandoriPart>,
    pub sheet: ActivitySheet,
}

pub struct DandoriApi {
    loader: RecordLoader,
    session: DandoriSession,
}

impl DandoriApi {
    pub fn new(loader: RecordLoader) -> Self {
        Self {
            loader,
            session: DandoriSession::default(),
        }
    }

    pub fn session(&self) -> &DandoriSession {
        &self.session
    }

    pub fn is_ready(&self) -> bool {
        self.session.master.is_some()
    }

    fn master(&self) -> ApiResult<&DandoriMaster> {
        self.session
            .master
            .as_ref()
            .ok_or_else(|| ApiError::NotReady("getMaster".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn load_master(&mut self) -> ApiResult<&DandoriMaster> {
        let _perf = PerfGuard::new("dandori_load_master");
        match self.loader.load_dandori_master().await {
            Ok(master) => {
                self.session.master = Some(master);
                self.session.selected_part = None;
                self.master()
            }
            Err(e) => {
                warn!(error = %e, "换模主数据加载失败，仅允许重试");
                self.session.master = None;
                Err(e.into())
            }
        }
    }

    /// 零件检索（少于 2 个字符时无结果）
    pub fn search_parts(&self, term: &str) -> ApiResult<Vec<DandoriPart>> {
        Ok(search_dandori_parts(&self.master()?.parts, term)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 按唯一键（零件号-工序号）选择零件
    pub fn select_part(&mut self, key: &str) -> ApiResult<&DandoriPart> {
        let part = self
            .master()?
            .part_by_key(key)
            .cloned()
            .ok_or_else(|| ApiError::validation("part_no", ValidationRule::NotInList))?;
        Ok(self.session.selected_part.insert(part))
    }

    pub fn clear_part(&mut self) {
        self.session.selected_part = None;
    }

    /// 机台所属产线
    pub fn line_for_machine(&self, machine: &str) -> ApiResult<Option<String>> {
        Ok(self.master()?.line_of(machine).map(str::to_string))
    }

    /// 损失代码描述
    pub fn loss_description(&self, code: &str) -> ApiResult<Option<String>> {
        Ok(self.master()?.loss_description(code).map(str::to_string))
    }

    // ===== 活动明细 =====

    pub fn sheet(&self) -> &ActivitySheet {
        &self.session.sheet
    }

    pub fn add_row(&mut self) -> usize {
        self.session.sheet.add_row()
    }

    pub fn set_row(&mut self, index: usize, code: &str, minutes: Option<u32>) -> bool {
        self.session.sheet.set_row(index, code, minutes)
    }

    /// 删除行（仅剩一行时拒绝）
    pub fn delete_row(&mut self, index: usize) -> bool {
        self.session.sheet.delete_row(index)
    }

    pub fn total_minutes(&self) -> u32 {
        self.session.sheet.total_minutes()
    }

    /// 当前状态（实际 vs 所选零件标准）
    pub fn status(&self) -> DandoriStatus {
        let standard = self
            .session
            .selected_part
            .as_ref()
            .map(|p| p.std_time_minutes)
            .unwrap_or(0.0);
        dandori_status(self.total_minutes() as f64, standard)
    }

    /// 提交换模记录，成功后清空零件与明细
    #[instrument(skip(self, header), fields(machine = %header.nama_mesin))]
    pub async fn submit(&mut self, header: &DandoriHeader) -> ApiResult<DandoriEntry> {
        let master = self.master()?;
        validate_dandori(self.total_minutes(), self.session.selected_part.is_some())?;
        let part = self
            .session
            .selected_part
            .as_ref()
            .ok_or_else(|| ApiError::validation("part_no", ValidationRule::Required))?;

        let entry = DandoriEntry {
            tanggal: header.tanggal,
            shift: header.shift.clone(),
            operator: header.operator.clone(),
            nama_mesin: header.nama_mesin.clone(),
            line: master.line_of(&header.nama_mesin).unwrap_or_default().to_string(),
            part_no: part.part_no.clone(),
            part_name: part.part_name.clone(),
            id_proses: part.id_proses.clone(),
            nama_proses: part.nama_proses.clone(),
            standard_time: part.std_time_minutes,
            rincian_detail: self.session.sheet.completed(),
        };

        let _perf = PerfGuard::new("dandori_submit");
        self.loader.submit_dandori(&entry).await?;
        info!(total = entry.total_minutes(), status = %self.status(), "换模记录已保存");

        self.session.sheet.reset();
        self.session.selected_part = None;
        Ok(entry)
    }
}
