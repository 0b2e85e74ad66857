// System Metrics Models
//
// 菜单栏小组件展示的系统指标快照

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 占用内存最多、触发提醒的进程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingProcess {
    pub pid: u32,
    pub name: String,
    /// 可执行文件路径，前端据此加载应用图标
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    pub memory_bytes: u64,
}

/// 网络吞吐（字节/秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkThroughput {
    pub rx_bytes_per_sec: u64,
    pub tx_bytes_per_sec: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub free_storage_bytes: u64,
    pub total_storage_bytes: u64,
    /// 内存占用比例 0.0 - 1.0
    pub memory_usage: f64,
    pub cpu_usage: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f32>,
    pub network: NetworkThroughput,
    pub high_memory_alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offending_process: Option<OffendingProcess>,
    pub sampled_at: DateTime<Utc>,
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            free_storage_bytes: 0,
            total_storage_bytes: 0,
            memory_usage: 0.0,
            cpu_usage: 0.0,
            battery_level: None,
            network: NetworkThroughput::default(),
            high_memory_alert: false,
            offending_process: None,
            sampled_at: Utc::now(),
        }
    }
}

/// 内存提醒窗口上的用户操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    /// 10 分钟内不再提醒
    SnoozeShort,
    /// 1 小时内不再提醒
    SnoozeLong,
    /// 永久忽略该进程
    IgnoreForever,
    /// 结束占用内存的进程
    Terminate,
    /// 打开主程序
    OpenMainApp,
}

impl AlertAction {
    pub const SHORT_SNOOZE: Duration = Duration::from_secs(10 * 60);
    pub const LONG_SNOOZE: Duration = Duration::from_secs(60 * 60);

    /// 稍后提醒对应的时长
    pub fn snooze_duration(&self) -> Option<Duration> {
        match self {
            AlertAction::SnoozeShort => Some(Self::SHORT_SNOOZE),
            AlertAction::SnoozeLong => Some(Self::LONG_SNOOZE),
            _ => None,
        }
    }

    /// 由前端传入的分钟数解析稍后提醒操作，仅支持 10 和 60
    pub fn snooze_from_minutes(minutes: u64) -> Option<Self> {
        match minutes {
            10 => Some(AlertAction::SnoozeShort),
            60 => Some(AlertAction::SnoozeLong),
            _ => None,
        }
    }
}
