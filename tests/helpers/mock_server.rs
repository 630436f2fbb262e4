// ==========================================
// 模拟表格 API - 用于 HTTP 数据源集成测试
// ==========================================
// axum 服务绑定 127.0.0.1 动态端口
// GET: 按 `action` 查询参数返回预置响应；未预置返回 404
// POST: 返回统一的预置响应，记录 Content-Type 与原始正文
// ==========================================

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub content_type: String,
    pub body: String,
}

#[derive(Default)]
struct ServerState {
    responses: Mutex<HashMap<String, (u16, Value)>>,
    post_response: Mutex<Option<(u16, Value)>>,
    delay: Mutex<Option<Duration>>,
    queries: Mutex<Vec<HashMap<String, String>>>,
    posts: Mutex<Vec<RecordedPost>>,
}

pub struct MockSheetServer {
    url: String,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl MockSheetServer {
    /// 启动服务
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let app = Router::new()
            .route("/exec", get(handle_get).post(handle_post))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("绑定端口失败");
        let addr = listener.local_addr().expect("获取端口失败");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}/exec", addr),
            state,
            handle,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 预置 GET 响应
    pub fn respond(&self, action: &str, status: u16, body: Value) {
        self.state
            .responses
            .lock()
            .expect("锁失败")
            .insert(action.to_string(), (status, body));
    }

    /// 预置 POST 响应
    pub fn respond_post(&self, status: u16, body: Value) {
        *self.state.post_response.lock().expect("锁失败") = Some((status, body));
    }

    /// 所有请求延迟响应
    pub fn delay(&self, delay: Duration) {
        *self.state.delay.lock().expect("锁失败") = Some(delay);
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().expect("锁失败").clone()
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.state.posts.lock().expect("锁失败").clone()
    }
}

impl Drop for MockSheetServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn current_delay(state: &ServerState) -> Option<Duration> {
    *state.delay.lock().expect("锁失败")
}

fn reply(found: Option<(u16, Value)>) -> (StatusCode, Json<Value>) {
    match found {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown action" }))),
    }
}

async fn handle_get(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let action = params.get("action").cloned().unwrap_or_default();
    state.queries.lock().expect("锁失败").push(params);

    if let Some(delay) = current_delay(&state) {
        tokio::time::sleep(delay).await;
    }
    let found = state.responses.lock().expect("锁失败").get(&action).cloned();
    reply(found)
}

async fn handle_post(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state
        .posts
        .lock()
        .expect("锁失败")
        .push(RecordedPost { content_type, body });

    if let Some(delay) = current_delay(&state) {
        tokio::time::sleep(delay).await;
    }
    let found = state.post_response.lock().expect("锁失败").clone();
    reply(found)
}
