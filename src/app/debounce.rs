// ==========================================
// 生产追踪系统 - 防抖
// ==========================================
// 职责: 输入稳定一段时间后才执行；新输入取消尚未执行的调用
// 红线: 只取消等待中的调用，已发出的请求继续执行到结束
// ==========================================

use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct Pending {
    generation: u64,
    handle: Option<AbortHandle>,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Pending>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(Pending::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Pending> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 取消尚未执行的调用
    pub fn cancel(&self) {
        if let Some(handle) = self.lock().handle.take() {
            handle.abort();
        }
    }

    /// 延迟执行
    ///
    /// # 返回
    /// - Some(T): 等待期间没有新调用，已执行
    /// - None: 被后续调用取代
    pub async fn call<F, Fut, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut pending = self.lock();
            if let Some(previous) = pending.handle.replace(handle) {
                previous.abort();
            }
            pending.generation += 1;
            pending.generation
        };

        if Abortable::new(tokio::time::sleep(self.delay), registration)
            .await
            .is_err()
        {
            tracing::debug!("防抖: 调用被新输入取代");
            return None;
        }

        {
            let mut pending = self.lock();
            if pending.generation == generation {
                pending.handle = None;
            }
        }
        Some(f().await)
    }
}
