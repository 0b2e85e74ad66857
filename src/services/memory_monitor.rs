// Memory Monitor - 内存占用告警策略
//
// 根据采样结果判断是否需要提醒，并维护按进程名的稍后提醒 / 永久忽略名单。
// 忽略名单只保存在内存中，应用重启后清空。

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::models::OffendingProcess;

/// 单个进程的内存采样
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub exe: Option<String>,
    pub memory_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySample {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub processes: Vec<ProcessSample>,
}

impl MemorySample {
    pub fn usage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes as f64 / self.total_bytes as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub usage: f64,
    pub high_memory_alert: bool,
    pub offender: Option<OffendingProcess>,
}

pub struct MemoryMonitor {
    threshold: f64,
    snoozed: HashMap<String, Instant>,
    ignored: HashSet<String>,
}

impl MemoryMonitor {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            snoozed: HashMap::new(),
            ignored: HashSet::new(),
        }
    }

    pub fn is_muted(&self, name: &str, now: Instant) -> bool {
        self.ignored.contains(name)
            || self
                .snoozed
                .get(name)
                .map(|until| *until > now)
                .unwrap_or(false)
    }

    pub fn evaluate(&mut self, sample: &MemorySample, now: Instant) -> AlertDecision {
        self.snoozed.retain(|_, until| *until > now);

        let usage = sample.usage();
        if usage < self.threshold {
            return AlertDecision {
                usage,
                high_memory_alert: false,
                offender: None,
            };
        }

        let offender = sample
            .processes
            .iter()
            .filter(|p| !self.is_muted(&p.name, now))
            .max_by_key(|p| p.memory_bytes)
            .map(|p| OffendingProcess {
                pid: p.pid,
                name: p.name.clone(),
                icon_path: p.exe.clone(),
                memory_bytes: p.memory_bytes,
            });

        if offender.is_none() {
            tracing::debug!(usage, "内存占用过高，但候选进程均已静默");
        }

        AlertDecision {
            usage,
            high_memory_alert: offender.is_some(),
            offender,
        }
    }

    /// 指定进程在 `duration` 内不再触发提醒
    pub fn snooze(&mut self, name: &str, duration: Duration, now: Instant) {
        tracing::info!(
            process = %name,
            minutes = duration.as_secs() / 60,
            "稍后提醒"
        );
        self.snoozed.insert(name.to_string(), now + duration);
    }

    pub fn ignore(&mut self, name: &str) {
        tracing::info!(process = %name, "永久忽略进程");
        self.ignored.insert(name.to_string());
    }
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new(crate::models::AlertConfig::default().threshold)
    }
}
