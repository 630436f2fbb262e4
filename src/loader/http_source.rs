// ==========================================
// 生产追踪系统 - HTTP 数据源
// ==========================================
// 职责: 基于 reqwest 的表格 API 访问
// 超时: 每个请求单独设置，超时报告为 LoadError::Timeout
// ==========================================

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::loader::error::{LoadError, LoadResult};
use crate::loader::source::{GetRequest, RecordSource};
use crate::perf;

/// 防缓存参数名
pub const CACHE_BUST_PARAM: &str = "_";

pub struct HttpRecordSource {
    client: Client,
    endpoint: String,
    default_timeout: Duration,
}

impl HttpRecordSource {
    /// 创建数据源
    ///
    /// # 参数
    /// - endpoint: 表格 API 地址（不含查询参数）
    /// - default_timeout: 默认请求超时
    pub fn new(endpoint: impl Into<String>, default_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            default_timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn finish(
        &self,
        action: &str,
        timeout: Duration,
        started: Instant,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> LoadResult<Value> {
        let timeout_ms = timeout.as_millis() as u64;
        let response = result.map_err(|e| LoadError::from_reqwest(action, timeout_ms, e));
        let outcome = match response {
            Ok(resp) if !resp.status().is_success() => Err(LoadError::HttpStatus {
                action: action.to_string(),
                status: resp.status().as_u16(),
            }),
            Ok(resp) => resp
                .json::<Value>()
                .await
                .map_err(|e| LoadError::from_reqwest(action, timeout_ms, e)),
            Err(e) => Err(e),
        };
        perf::record_http_request(action, started.elapsed());
        outcome
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    #[instrument(skip(self, request), fields(action = %request.action))]
    async fn get(&self, request: GetRequest) -> LoadResult<Value> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let mut query: Vec<(String, String)> = vec![("action".to_string(), request.action.clone())];
        query.extend(request.params.iter().cloned());
        if request.cache_bust {
            query.push((
                CACHE_BUST_PARAM.to_string(),
                chrono::Utc::now().timestamp_millis().to_string(),
            ));
        }
        debug!(params = query.len(), "GET");

        let started = Instant::now();
        let result = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .query(&query)
            .timeout(timeout)
            .send()
            .await;
        self.finish(&request.action, timeout, started, result).await
    }

    #[instrument(skip(self, fields))]
    async fn post_form(&self, action: &str, fields: Vec<(String, String)>) -> LoadResult<Value> {
        let started = Instant::now();
        let result = self
            .client
            .post(&self.endpoint)
            .form(&fields)
            .timeout(self.default_timeout)
            .send()
            .await;
        self.finish(action, self.default_timeout, started, result).await
    }

    #[instrument(skip(self, body))]
    async fn post_json(&self, action: &str, body: Value) -> LoadResult<Value> {
        let started = Instant::now();
        let result = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .timeout(self.default_timeout)
            .send()
            .await;
        self.finish(action, self.default_timeout, started, result).await
    }
}
