// ==========================================
// 生产追踪系统 - 远程数据源 Trait
// ==========================================
// 职责: 定义表格 API 的传输接口（不包含形态校验）
// 实现者: HttpRecordSource（reqwest）；测试中使用内存假数据源
// 红线: 单次请求，不做自动重试
// ==========================================

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::loader::error::LoadResult;

/// GET 请求描述
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    /// action 名（如 getAchievementData）
    pub action: String,
    /// 附加查询参数
    pub params: Vec<(String, String)>,
    /// 覆盖默认超时
    pub timeout: Option<Duration>,
    /// 追加 `_=<epoch millis>` 防缓存参数
    pub cache_bust: bool,
}

impl GetRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: Vec::new(),
            timeout: None,
            cache_bust: false,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cache_bust(mut self) -> Self {
        self.cache_bust = true;
        self
    }

    /// 查询参数值
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ==========================================
// RecordSource Trait
// ==========================================
// 返回原始 JSON；HTTP 状态/超时/解码错误在此层转换为 LoadError
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// GET `?action=...`
    async fn get(&self, request: GetRequest) -> LoadResult<Value>;

    /// POST 表单（字段中包含 action）
    async fn post_form(&self, action: &str, fields: Vec<(String, String)>) -> LoadResult<Value>;

    /// POST JSON 正文
    async fn post_json(&self, action: &str, body: Value) -> LoadResult<Value>;
}
