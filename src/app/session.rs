// ==========================================
// 生产追踪系统 - 跨屏幕交接存储
// ==========================================
// 职责: 看板 → 报表屏幕的报表载荷交接（会话级、带有效期）
// 语义: 读取即删除；过期视为不存在
// ==========================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::domain::report::ReportPayload;
use crate::export::error::{ExportError, ExportResult};

/// 报表载荷的交接键
pub const REPORT_DATA_KEY: &str = "reportData";

#[derive(Debug)]
struct HandoffEntry {
    json: String,
    stored_at: Instant,
}

/// 会话级交接存储（值以 JSON 文本保存）
#[derive(Debug)]
pub struct HandoffStore {
    session_id: Uuid,
    ttl: Duration,
    entries: Mutex<HashMap<String, HandoffEntry>>,
}

impl HandoffStore {
    pub fn new(ttl: Duration) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, ttl_secs = ttl.as_secs(), "创建交接存储");
        Self {
            session_id,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HandoffEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 写入（同键覆盖）
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> ExportResult<()> {
        let json = serde_json::to_string(value).map_err(|e| ExportError::Serialize(e.to_string()))?;
        tracing::debug!(key, bytes = json.len(), "写入交接数据");
        self.lock().insert(
            key.to_string(),
            HandoffEntry {
                json,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// 读取并删除
    ///
    /// # 返回
    /// - Ok(None): 不存在或已过期
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> ExportResult<Option<T>> {
        let entry = match self.lock().remove(key) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if entry.stored_at.elapsed() >= self.ttl {
            tracing::warn!(key, "交接数据已过期，已丢弃");
            return Ok(None);
        }

        serde_json::from_str(&entry.json)
            .map(Some)
            .map_err(|e| ExportError::Serialize(e.to_string()))
    }

    /// 是否存在未过期的键
    pub fn contains(&self, key: &str) -> bool {
        self.lock()
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    pub fn put_report(&self, payload: &ReportPayload) -> ExportResult<()> {
        self.put(REPORT_DATA_KEY, payload)
    }

    pub fn take_report(&self) -> ExportResult<Option<ReportPayload>> {
        self.take(REPORT_DATA_KEY)
    }
}
