// ==========================================
// 内存假数据源 - 用于 API 层集成测试
// ==========================================
// 按 action 预置响应；最后一个响应会被重复使用
// 记录全部请求，便于断言"未发请求"
// ==========================================

use async_trait::async_trait;
use production_tracking::loader::{GetRequest, LoadError, LoadResult, RecordLoader, RecordSource};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// 已记录的请求
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Get(GetRequest),
    Form {
        action: String,
        fields: Vec<(String, String)>,
    },
    Json {
        action: String,
        body: Value,
    },
}

impl RecordedRequest {
    pub fn action(&self) -> &str {
        match self {
            RecordedRequest::Get(req) => &req.action,
            RecordedRequest::Form { action, .. } | RecordedRequest::Json { action, .. } => action,
        }
    }
}

#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, VecDeque<LoadResult<Value>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 预置成功响应
    pub fn respond(&self, action: &str, value: Value) -> &Self {
        self.push(action, Ok(value))
    }

    /// 预置失败响应
    pub fn fail(&self, action: &str, err: LoadError) -> &Self {
        self.push(action, Err(err))
    }

    fn push(&self, action: &str, result: LoadResult<Value>) -> &Self {
        self.responses
            .lock()
            .expect("responses 锁失败")
            .entry(action.to_string())
            .or_default()
            .push_back(result);
        self
    }

    fn next(&self, action: &str) -> LoadResult<Value> {
        let mut responses = self.responses.lock().expect("responses 锁失败");
        match responses.get_mut(action) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("队列非空"),
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            _ => Err(LoadError::Network {
                action: action.to_string(),
                message: "未预置响应".to_string(),
            }),
        }
    }

    /// 基于本数据源的加载器
    pub fn loader(self: &Arc<Self>) -> RecordLoader {
        RecordLoader::new(self.clone())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests 锁失败").clone()
    }

    /// 某 action 的请求次数
    pub fn count(&self, action: &str) -> usize {
        self.requests().iter().filter(|r| r.action() == action).count()
    }

    /// 最后一次 GET 请求
    pub fn last_get(&self, action: &str) -> Option<GetRequest> {
        self.requests().into_iter().rev().find_map(|r| match r {
            RecordedRequest::Get(req) if req.action == action => Some(req),
            _ => None,
        })
    }

    /// 最后一次 JSON 正文
    pub fn last_json(&self, action: &str) -> Option<Value> {
        self.requests().into_iter().rev().find_map(|r| match r {
            RecordedRequest::Json { action: a, body } if a == action => Some(body),
            _ => None,
        })
    }

    /// 最后一次表单字段
    pub fn last_form(&self, action: &str) -> Option<Vec<(String, String)>> {
        self.requests().into_iter().rev().find_map(|r| match r {
            RecordedRequest::Form { action: a, fields } if a == action => Some(fields),
            _ => None,
        })
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().expect("requests 锁失败").push(request);
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn get(&self, request: GetRequest) -> LoadResult<Value> {
        let action = request.action.clone();
        self.record(RecordedRequest::Get(request));
        self.next(&action)
    }

    async fn post_form(&self, action: &str, fields: Vec<(String, String)>) -> LoadResult<Value> {
        self.record(RecordedRequest::Form {
            action: action.to_string(),
            fields,
        });
        self.next(action)
    }

    async fn post_json(&self, action: &str, body: Value) -> LoadResult<Value> {
        self.record(RecordedRequest::Json {
            action: action.to_string(),
            body,
        });
        self.next(action)
    }
}
