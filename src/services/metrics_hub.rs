// Metrics Hub
//
// 系统指标的可观察数据源：监控方发布快照，各窗口订阅

use tauri::async_runtime::{self, JoinHandle};
use tokio::sync::watch;

use crate::models::SystemSnapshot;

pub struct MetricsHub {
    tx: watch::Sender<SystemSnapshot>,
}

impl MetricsHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SystemSnapshot::default());
        Self { tx }
    }

    /// 替换当前快照并通知所有订阅者
    pub fn publish(&self, snapshot: SystemSnapshot) {
        self.tx.send_replace(snapshot);
    }

    pub fn current(&self) -> SystemSnapshot {
        self.tx.borrow().clone()
    }

    /// 订阅后续的快照更新；返回的 [`Subscription`] 被丢弃时自动退订
    pub fn subscribe<F>(&self, mut handler: F) -> Subscription
    where
        F: FnMut(SystemSnapshot) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let handle = async_runtime::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                handler(snapshot);
            }
            tracing::debug!("指标发布端已关闭，订阅结束");
        });
        Subscription {
            handle: Some(handle),
        }
    }
}

impl Default for MetricsHub {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use = "丢弃 Subscription 会立即退订"]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
