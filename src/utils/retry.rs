//! 有限次数的延迟重试
//!
//! 状态栏图标在应用刚启动时可能还无法创建，按固定间隔重试若干次。

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// 状态栏图标创建：最多 5 次，每次间隔 500ms
    pub const STATUS_ICON: RetryPolicy = RetryPolicy {
        max_attempts: 5,
        delay: Duration::from_millis(500),
    };

    /// 依次尝试 `op`（参数为从 1 开始的尝试序号），成功即返回；全部失败时返回最后一次的错误
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(what, attempt, "重试成功");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(what, attempt, error = %e, "操作失败，稍后重试");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(what, attempt, error = %e, "重试次数耗尽");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const FAST: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
    };

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = Cell::new(0);
        let result: Result<u32, String> = FAST
            .run("测试", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 2 {
                        Err("未就绪".to_string())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), String> = FAST
            .run("测试", |attempt| {
                calls.set(calls.get() + 1);
                async move { Err(format!("第 {} 次失败", attempt)) }
            })
            .await;
        assert_eq!(result, Err("第 3 次失败".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_millis(1),
        };
        let result: Result<(), &str> = policy.run("测试", |_| async { Err("失败") }).await;
        assert!(result.is_err());
    }
}
