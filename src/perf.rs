use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static SLOW_HTTP_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static SLOW_HTTP_INIT: OnceLock<()> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static HTTP_COUNT: Cell<u64> = Cell::new(0);
    static SLOW_HTTP_COUNT: Cell<u64> = Cell::new(0);
}

/// 慢请求阈值（毫秒）
///
/// - `PRODUCTION_TRACKING_SLOW_HTTP_MS=2000` 配置阈值
/// - 未配置时 Debug 1000ms / Release 3000ms；0 表示关闭
fn slow_threshold_ms() -> u64 {
    SLOW_HTTP_INIT.get_or_init(|| {
        let ms = std::env::var("PRODUCTION_TRACKING_SLOW_HTTP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 1000 } else { 3000 });
        SLOW_HTTP_THRESHOLD_MS.store(ms, Ordering::Relaxed);
    });
    SLOW_HTTP_THRESHOLD_MS.load(Ordering::Relaxed)
}

/// 记录一次 HTTP 请求（由数据源在请求结束后调用）
pub fn record_http_request(action: &str, duration: Duration) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        HTTP_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }

    let ms = duration.as_millis() as u64;
    let threshold = slow_threshold_ms();
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_http",
            duration_ms = ms,
            action,
            "slow request"
        );
        if active {
            SLOW_HTTP_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard：记录 elapsed_ms + HTTP 请求数 + 慢请求数
///
/// 使用方式：
/// ```ignore
/// let _perf = production_tracking::perf::PerfGuard::new("dashboard_load");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    http_start: u64,
    slow_http_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            http_start: HTTP_COUNT.with(|c| c.get()),
            slow_http_start: SLOW_HTTP_COUNT.with(|c| c.get()),
        }
    }

    /// 本 Guard 生效期间已记录的请求数
    pub fn http_count(&self) -> u64 {
        HTTP_COUNT.with(|c| c.get()).saturating_sub(self.http_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let http_count = self.http_count();
        let slow_http_count = SLOW_HTTP_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_http_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            http_count,
            slow_http_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
