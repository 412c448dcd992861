//! 限流包装客户端
//!
//! 固定窗口令牌桶：窗口内最多 N 次补全请求，超出返回 RateLimited，
//! 由引擎按降级轮次处理而非上抛。包装任意 CompletionClient。

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use crate::llm::{CompletionClient, CompletionRequest, CompletionResponse, LlmError};

struct Bucket {
    tokens: u32,
    window_start: Instant,
}

/// 限流客户端：转发前从令牌桶取令牌，窗口滚动时整桶补满
pub struct RateLimitedClient {
    inner: Arc<dyn CompletionClient>,
    capacity: u32,
    window: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimitedClient {
    pub fn new(inner: Arc<dyn CompletionClient>, requests_per_minute: u32) -> Self {
        let capacity = requests_per_minute.max(1);
        Self {
            inner,
            capacity,
            window: Duration::from_secs(60),
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                window_start: Instant::now(),
            }),
        }
    }

    fn bucket_lock(&self) -> MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn try_acquire(&self) -> Result<(), LlmError> {
        let mut bucket = self.bucket_lock();
        let now = Instant::now();
        if now.duration_since(bucket.window_start) >= self.window {
            bucket.tokens = self.capacity;
            bucket.window_start = now;
        }
        if bucket.tokens == 0 {
            let elapsed = now.duration_since(bucket.window_start);
            let retry_after_ms = self.window.saturating_sub(elapsed).as_millis() as u64;
            return Err(LlmError::RateLimited { retry_after_ms });
        }
        bucket.tokens -= 1;
        Ok(())
    }
}

#[async_trait]
impl CompletionClient for RateLimitedClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.try_acquire()?;
        self.inner.generate(request).await
    }
}
