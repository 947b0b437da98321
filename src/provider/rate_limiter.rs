use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// 令牌桶限速器，约束对行情接口的请求频率
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    tokens_per_second: u32,
    max_tokens: u32,
    last_refill: tokio::sync::Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(tokens_per_second: u32, max_tokens: u32) -> Self {
        let tokens_per_second = tokens_per_second.max(1);
        let max_tokens = max_tokens.max(1);

        Self {
            semaphore: Arc::new(Semaphore::new(max_tokens as usize)),
            tokens_per_second,
            max_tokens,
            last_refill: tokio::sync::Mutex::new(Instant::now()),
        }
    }

    /// 取一个令牌，无可用令牌时等待补充
    pub async fn acquire(&self) {
        let wait_duration = Duration::from_secs_f64(1.0 / f64::from(self.tokens_per_second));

        loop {
            self.refill_tokens().await;

            match self.semaphore.try_acquire() {
                Ok(permit) => {
                    // 令牌消费后由 refill_tokens 补充，不归还
                    permit.forget();
                    return;
                }
                Err(tokio::sync::TryAcquireError::NoPermits) => {
                    sleep(wait_duration).await;
                }
                Err(tokio::sync::TryAcquireError::Closed) => {
                    warn!("限速器信号量意外关闭");
                    sleep(wait_duration).await;
                }
            }
        }
    }

    async fn refill_tokens(&self) {
        let mut last_refill = self.last_refill.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(*last_refill);

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let tokens_to_add = (elapsed.as_secs_f64() * f64::from(self.tokens_per_second)) as u32;

        if tokens_to_add > 0 {
            let current_tokens = self.semaphore.available_permits() as u32;
            let tokens_needed = self.max_tokens.saturating_sub(current_tokens);
            let tokens_to_add = tokens_to_add.min(tokens_needed);

            if tokens_to_add > 0 {
                self.semaphore.add_permits(tokens_to_add as usize);
                *last_refill = now;
            }
        }
    }

    /// 限速执行一次请求；仅在上游明确限流（429）时退避重试
    pub async fn execute<F, T, E>(&self, request_name: &str, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, E>> + Send>>,
        E: std::fmt::Display,
    {
        const MAX_RETRIES: u32 = 3;
        let mut retry_count = 0;
        let mut backoff_duration = Duration::from_secs(1);

        loop {
            self.acquire().await;

            debug!("执行限速请求：{request_name}");

            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    // anyhow 的默认 Display 只给最外层 context，{:#} 才带完整错误链
                    let error_msg = format!("{e:#}").to_lowercase();
                    let is_throttled = error_msg.contains("429")
                        || error_msg.contains("too many requests");

                    if is_throttled && retry_count < MAX_RETRIES {
                        retry_count += 1;
                        warn!(
                            "请求被限流：{request_name}（第 {retry_count}/{MAX_RETRIES} 次），{backoff_duration:?} 后重试"
                        );
                        sleep(backoff_duration).await;
                        backoff_duration *= 2;
                        continue;
                    }

                    return Err(e);
                }
            }
        }
    }

    pub fn available_tokens(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// 全局限速器：东方财富接口无公开配额，按 5 次/秒、峰值 10 保守取值
static RATE_LIMITER: std::sync::OnceLock<RateLimiter> = std::sync::OnceLock::new();

pub fn global_rate_limiter() -> &'static RateLimiter {
    RATE_LIMITER.get_or_init(|| RateLimiter::new(5, 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::new(10, 20);

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn exhausted_bucket_waits_for_refill() {
        let limiter = RateLimiter::new(10, 5);
        assert_eq!(limiter.available_tokens(), 5);

        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.available_tokens(), 0);

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn retries_only_on_throttle_errors() {
        let limiter = RateLimiter::new(10, 20);
        let mut attempt = 0;

        let result = limiter
            .execute("test.throttled", || {
                attempt += 1;
                Box::pin(async move {
                    if attempt < 2 {
                        Err("429 too many requests")
                    } else {
                        Ok(42)
                    }
                })
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempt, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_detected_through_context_chain() {
        use anyhow::{anyhow, Context};

        let limiter = RateLimiter::new(10, 20);
        let mut attempt = 0;

        // 接口层所有失败都包了一层 context，限流特征在错误链深处
        let result = limiter
            .execute("test.context_chain", || {
                attempt += 1;
                Box::pin(async move {
                    if attempt < 2 {
                        Err(
                            anyhow!("HTTP status client error (429 Too Many Requests)")
                                .context("行情快照接口返回错误状态"),
                        )
                    } else {
                        Ok(7)
                    }
                })
            })
            .await;

        assert_eq!(result.ok(), Some(7));
        assert_eq!(attempt, 2);
    }

    #[tokio::test]
    async fn plain_errors_surface_once() {
        let limiter = RateLimiter::new(10, 20);
        let mut attempt = 0;

        let result: Result<u8, &str> = limiter
            .execute("test.plain_error", || {
                attempt += 1;
                Box::pin(async move { Err("connection refused") })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempt, 1);
    }
}
