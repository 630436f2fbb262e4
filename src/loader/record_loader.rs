// ==========================================
// 生产追踪系统 - 记录加载器
// ==========================================
// 职责: 按 action 拉取/提交数据，校验最小形态，输出强类型结果
// 失败判定:
// - 响应含非空 `error` 字段
// - `status` 存在且不为 success（不区分大小写）
// - 期望的数据集缺失或为空
// 红线: 单次请求，不重试；失败原样上报
// ==========================================

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::domain::breakdown::{BreakdownEntry, BreakdownReceipt};
use crate::domain::dandori::DandoriEntry;
use crate::domain::lenient;
use crate::domain::master::{DandoriMaster, DropdownData, LkdCounter, MasterDies};
use crate::domain::production::{ProductionEntry, ProductionRecord, SubmitMetrics};
use crate::domain::report::ReportPayload;
use crate::domain::types::GroupLine;
use crate::loader::error::{LoadError, LoadResult};
use crate::loader::source::{GetRequest, RecordSource};

// ==========================================
// action 名
// ==========================================
pub mod actions {
    pub const GET_ACHIEVEMENT_DATA: &str = "getAchievementData";
    pub const GET_DROPDOWNS: &str = "getDropdowns";
    pub const GET_REPORT_DATA: &str = "getReportData";
    pub const GET_MASTER_DIES: &str = "getMasterDies";
    pub const GET_LAST_NO_LKD: &str = "getLastNoLKD";
    pub const GET_MASTER: &str = "getMaster";
    pub const ADD_BREAKDOWN: &str = "addBreakdown";
    pub const SUBMIT_PRODUCTION: &str = "submitProduction";
    pub const SUBMIT_DANDORI: &str = "submitDandori";
}

fn as_object<'a>(action: &str, value: &'a Value) -> LoadResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| LoadError::Decode {
        action: action.to_string(),
        message: "响应不是 JSON 对象".to_string(),
    })
}

/// 业务错误检查
///
/// `require_status` 为 true 时（POST 类 action）缺少 status 也视为失败
fn check_business(action: &str, value: &Value, require_status: bool) -> LoadResult<()> {
    let obj = as_object(action, value)?;

    if let Some(err) = obj.get("error").filter(|e| !e.is_null()) {
        let message = lenient::value_to_string(err);
        if !message.trim().is_empty() && message != "false" {
            return Err(LoadError::Api {
                action: action.to_string(),
                message,
            });
        }
    }

    match obj.get("status").and_then(Value::as_str) {
        Some(status) if status.eq_ignore_ascii_case("success") => Ok(()),
        Some(status) => Err(LoadError::Api {
            action: action.to_string(),
            message: obj
                .get("message")
                .map(lenient::value_to_string)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("status: {}", status)),
        }),
        None if require_status => Err(LoadError::MissingField {
            action: action.to_string(),
            field: "status".to_string(),
        }),
        None => Ok(()),
    }
}

/// 取必需字段（缺失或为 null → MissingField）
fn require_field<'a>(action: &str, value: &'a Value, field: &str) -> LoadResult<&'a Value> {
    as_object(action, value)?
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| LoadError::MissingField {
            action: action.to_string(),
            field: field.to_string(),
        })
}

/// 取必需且非空的数组
fn require_collection<'a>(action: &str, value: &'a Value, field: &str) -> LoadResult<&'a Vec<Value>> {
    match as_object(action, value)?.get(field).and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(LoadError::EmptyCollection {
            action: action.to_string(),
            collection: field.to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(action: &str, value: Value) -> LoadResult<T> {
    serde_json::from_value(value).map_err(|e| LoadError::Decode {
        action: action.to_string(),
        message: e.to_string(),
    })
}

fn group_line_param(lines: &[GroupLine]) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(","))
    }
}

// ==========================================
// RecordLoader
// ==========================================
#[derive(Clone)]
pub struct RecordLoader {
    source: Arc<dyn RecordSource>,
}

impl RecordLoader {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    // ===== 看板 =====

    /// 加载生产实绩（`records` 缺失或为空均为错误）
    #[instrument(skip(self))]
    pub async fn load_production_records(&self) -> LoadResult<Vec<ProductionRecord>> {
        let action = actions::GET_ACHIEVEMENT_DATA;
        let value = self.source.get(GetRequest::new(action)).await?;
        check_business(action, &value, false)?;
        let items = require_collection(action, &value, "records")?;
        let records: Vec<ProductionRecord> = decode(action, Value::Array(items.clone()))?;
        info!(count = records.len(), "生产实绩加载完成");
        Ok(records)
    }

    // ===== 下拉主数据 =====

    /// 加载下拉主数据（不校验字段完整性）
    #[instrument(skip(self))]
    pub async fn load_dropdowns(&self) -> LoadResult<DropdownData> {
        let action = actions::GET_DROPDOWNS;
        let value = self.source.get(GetRequest::new(action)).await?;
        check_business(action, &value, false)?;
        let data: DropdownData = decode(action, value)?;
        info!(
            parts = data.parts.len(),
            machines = data.machines.len(),
            group_lines = data.group_lines.len(),
            "下拉主数据加载完成"
        );
        Ok(data)
    }

    /// 加载实绩录入所需主数据（`parts` 与 `machines` 必须存在）
    #[instrument(skip(self))]
    pub async fn load_production_master(&self) -> LoadResult<DropdownData> {
        let action = actions::GET_DROPDOWNS;
        let value = self.source.get(GetRequest::new(action)).await?;
        check_business(action, &value, false)?;
        require_field(action, &value, "parts")?;
        require_field(action, &value, "machines")?;
        let data: DropdownData = decode(action, value)?;
        info!(parts = data.parts.len(), machines = data.machines.len(), "录入主数据加载完成");
        Ok(data)
    }

    // ===== 报表 =====

    /// 拉取日期范围内的报表记录（用于按产线估算；`records` 缺失视为 0 条）
    #[instrument(skip(self))]
    pub async fn fetch_report_records(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        timeout: Duration,
    ) -> LoadResult<Vec<ProductionRecord>> {
        let action = actions::GET_REPORT_DATA;
        let request = GetRequest::new(action)
            .param("dateFrom", date_from.to_string())
            .param("dateTo", date_to.to_string())
            .timeout(timeout);
        let value = self.source.get(request).await?;
        check_business(action, &value, false)?;

        let records = match value.get("records").and_then(Value::as_array) {
            Some(items) => decode(action, Value::Array(items.clone()))?,
            None => Vec::new(),
        };
        info!(count = records.len(), "报表记录估算数据加载完成");
        Ok(records)
    }

    /// 加载报表数据
    ///
    /// 服务端未返回表头时按请求参数补齐；产线筛选以请求为准
    #[instrument(skip(self))]
    pub async fn load_report_data(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        lines: &[GroupLine],
    ) -> LoadResult<ReportPayload> {
        let action = actions::GET_REPORT_DATA;
        let mut request = GetRequest::new(action)
            .param("dateFrom", date_from.to_string())
            .param("dateTo", date_to.to_string());
        if let Some(param) = group_line_param(lines) {
            request = request.param("groupLine", param);
        }

        let mut value = self.source.get(request).await?;
        check_business(action, &value, false)?;
        require_field(action, &value, "records")?;

        if let Some(obj) = value.as_object_mut() {
            let header = obj
                .entry("header")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(h) = header.as_object_mut() {
                h.entry("dateFrom")
                    .or_insert_with(|| Value::String(date_from.to_string()));
                h.entry("dateTo")
                    .or_insert_with(|| Value::String(date_to.to_string()));
                if !lines.is_empty() {
                    h.insert(
                        "groupLineFilter".to_string(),
                        Value::Array(lines.iter().map(|l| Value::String(l.to_string())).collect()),
                    );
                }
            }
        }

        let payload: ReportPayload = decode(action, value)?;
        info!(records = payload.records.len(), machines = payload.machines.len(), "报表数据加载完成");
        Ok(payload)
    }

    // ===== 模具故障 =====

    /// 加载模具主数据
    #[instrument(skip(self))]
    pub async fn load_master_dies(&self) -> LoadResult<Vec<MasterDies>> {
        let action = actions::GET_MASTER_DIES;
        let value = self.source.get(GetRequest::new(action).cache_bust()).await?;
        check_business(action, &value, true)?;
        let items = require_collection(action, &value, "data")?;
        let dies: Vec<MasterDies> = decode(action, Value::Array(items.clone()))?;
        info!(count = dies.len(), "模具主数据加载完成");
        Ok(dies)
    }

    /// 加载故障单号计数
    #[instrument(skip(self))]
    pub async fn load_lkd_counter(&self) -> LoadResult<LkdCounter> {
        let action = actions::GET_LAST_NO_LKD;
        let value = self.source.get(GetRequest::new(action).cache_bust()).await?;
        check_business(action, &value, true)?;

        let text = |key: &str| {
            value
                .get(key)
                .map(lenient::value_to_string)
                .filter(|s| !s.trim().is_empty())
        };
        let mut counter = LkdCounter::default();
        counter.last_number = text("lastNumber");
        if let Some(suggested) = text("suggestedNumber") {
            counter.suggested_number = suggested;
        }
        Ok(counter)
    }

    /// 提交故障记录（表单 POST）
    #[instrument(skip(self, entry), fields(id_dies = %entry.id_dies))]
    pub async fn submit_breakdown(&self, entry: &BreakdownEntry) -> LoadResult<BreakdownReceipt> {
        let action = actions::ADD_BREAKDOWN;
        let fields = entry
            .to_form_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let value = self.source.post_form(action, fields).await?;
        check_business(action, &value, true)?;
        let data = require_field(action, &value, "data")?.clone();
        let receipt: BreakdownReceipt = decode(action, data)?;
        info!(no_lkd = %receipt.no_lkd, "故障记录提交成功");
        Ok(receipt)
    }

    // ===== 换模 =====

    /// 加载换模主数据（`mesin`/`dies`/`losstime` 均为二维数组）
    #[instrument(skip(self))]
    pub async fn load_dandori_master(&self) -> LoadResult<DandoriMaster> {
        let action = actions::GET_MASTER;
        let value = self.source.get(GetRequest::new(action).cache_bust()).await?;
        check_business(action, &value, false)?;

        let rows = |field: &str| -> LoadResult<Vec<Vec<Value>>> {
            let raw = require_field(action, &value, field)?.clone();
            decode(action, raw)
        };
        let master = DandoriMaster::from_rows(&rows("mesin")?, &rows("dies")?, &rows("losstime")?);
        if master.parts.is_empty() {
            warn!("换模主数据中没有零件");
        }
        info!(
            machines = master.machines.len(),
            parts = master.parts.len(),
            loss_codes = master.loss_codes.len(),
            "换模主数据加载完成"
        );
        Ok(master)
    }

    /// 提交换模记录（成功状态为 SUCCESS）
    #[instrument(skip(self, entry), fields(machine = %entry.nama_mesin))]
    pub async fn submit_dandori(&self, entry: &DandoriEntry) -> LoadResult<()> {
        let action = actions::SUBMIT_DANDORI;
        let body = serde_json::to_value(entry).map_err(|e| LoadError::Decode {
            action: action.to_string(),
            message: e.to_string(),
        })?;
        let value = self.source.post_json(action, body).await?;
        check_business(action, &value, true)?;
        info!(total_minutes = entry.total_minutes(), "换模记录提交成功");
        Ok(())
    }

    // ===== 实绩录入 =====

    /// 提交生产实绩，返回服务端计算的指标
    #[instrument(skip(self, entry), fields(part = %entry.part_name))]
    pub async fn submit_production(&self, entry: &ProductionEntry) -> LoadResult<SubmitMetrics> {
        let action = actions::SUBMIT_PRODUCTION;
        let body = serde_json::to_value(entry).map_err(|e| LoadError::Decode {
            action: action.to_string(),
            message: e.to_string(),
        })?;
        let value = self.source.post_json(action, body).await?;
        check_business(action, &value, true)?;
        let metrics = require_field(action, &value, "metrics")?.clone();
        let metrics: SubmitMetrics = decode(action, metrics)?;
        info!(performance = metrics.performance_score, "生产实绩提交成功");
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_business_error_field() {
        let err = check_business("a", &json!({ "error": "Sheet not found" }), false).unwrap_err();
        assert_eq!(
            err,
            LoadError::Api {
                action: "a".to_string(),
                message: "Sheet not found".to_string()
            }
        );
        assert!(check_business("a", &json!({ "error": null, "records": [] }), false).is_ok());
    }

    #[test]
    fn test_check_business_status_case_insensitive() {
        assert!(check_business("a", &json!({ "status": "SUCCESS" }), true).is_ok());
        assert!(check_business("a", &json!({ "status": "success" }), true).is_ok());

        let err = check_business("a", &json!({ "status": "error", "message": "dup" }), true).unwrap_err();
        assert!(matches!(err, LoadError::Api { message, .. } if message == "dup"));

        let err = check_business("a", &json!({}), true).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field, .. } if field == "status"));
        assert!(check_business("a", &json!({}), false).is_ok());
    }

    #[test]
    fn test_check_business_rejects_non_object() {
        let err = check_business("a", &json!([1, 2]), false).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_require_collection() {
        let value = json!({ "records": [], "data": [1] });
        assert!(matches!(
            require_collection("a", &value, "records"),
            Err(LoadError::EmptyCollection { .. })
        ));
        assert!(require_collection("a", &value, "missing").is_err());
        assert_eq!(require_collection("a", &value, "data").unwrap().len(), 1);
    }

    #[test]
    fn test_group_line_param() {
        let lines: Vec<GroupLine> = ["A", "B"].iter().filter_map(|s| GroupLine::parse(s)).collect();
        assert_eq!(group_line_param(&lines).as_deref(), Some("A,B"));
        assert_eq!(group_line_param(&[]), None);
    }
}
