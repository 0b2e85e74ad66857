// System Sampler
//
// 基于 sysinfo 的定时采样：内存、CPU、磁盘、网络，结果交给内存告警策略后发布

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use sysinfo::{Disks, Networks, Pid, ProcessesToUpdate, System};
use tokio::time;

use super::memory_monitor::{MemoryMonitor, MemorySample, ProcessSample};
use super::metrics_hub::MetricsHub;
use crate::error::{AppError, AppResult};
use crate::models::metrics::NetworkThroughput;
use crate::models::SystemSnapshot;

pub struct SysinfoSampler {
    sys: System,
    disks: Disks,
    networks: Networks,
    last_network_refresh: Instant,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            sys: System::new_all(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            last_network_refresh: Instant::now(),
        }
    }

    /// 采集一次；返回内存采样和不含告警字段的快照
    pub fn collect(&mut self) -> (MemorySample, SystemSnapshot) {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        self.disks.refresh(true);
        self.networks.refresh(true);

        let processes = self
            .sys
            .processes()
            .values()
            .map(|p| ProcessSample {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().to_string(),
                exe: p.exe().map(|path| path.to_string_lossy().to_string()),
                memory_bytes: p.memory(),
            })
            .collect();

        let memory = MemorySample {
            used_bytes: self.sys.used_memory(),
            total_bytes: self.sys.total_memory(),
            processes,
        };

        let (free_storage_bytes, total_storage_bytes) = self.storage();

        let now = Instant::now();
        let elapsed = now
            .duration_since(self.last_network_refresh)
            .as_secs_f64()
            .max(1.0);
        self.last_network_refresh = now;
        let (rx, tx) = self
            .networks
            .list()
            .values()
            .fold((0u64, 0u64), |(rx, tx), data| {
                (rx + data.received(), tx + data.transmitted())
            });

        let snapshot = SystemSnapshot {
            free_storage_bytes,
            total_storage_bytes,
            memory_usage: memory.usage(),
            cpu_usage: self.sys.global_cpu_usage(),
            battery_level: None,
            network: NetworkThroughput {
                rx_bytes_per_sec: (rx as f64 / elapsed) as u64,
                tx_bytes_per_sec: (tx as f64 / elapsed) as u64,
            },
            high_memory_alert: false,
            offending_process: None,
            sampled_at: Utc::now(),
        };

        tracing::trace!(
            memory_usage = snapshot.memory_usage,
            cpu = snapshot.cpu_usage,
            "系统采样完成"
        );
        (memory, snapshot)
    }

    /// 系统盘的可用 / 总空间；APFS 多卷共享容器，优先取挂载在 `/` 的卷
    fn storage(&self) -> (u64, u64) {
        let list = self.disks.list();
        if let Some(root) = list.iter().find(|d| d.mount_point() == Path::new("/")) {
            return (root.available_space(), root.total_space());
        }
        list.iter().fold((0, 0), |(free, total), d| {
            (free + d.available_space(), total + d.total_space())
        })
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// 结束指定进程；进程已不存在时视为成功。
///
/// pid 已被其他进程复用（名称与 `expected_name` 不符）时拒绝结束。
pub fn terminate_process(pid: u32, expected_name: &str) -> AppResult<()> {
    let pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    match sys.process(pid) {
        Some(process) => {
            let name = process.name().to_string_lossy().to_string();
            if name != expected_name {
                tracing::warn!(
                    pid = pid.as_u32(),
                    process = %name,
                    expected = %expected_name,
                    "进程已变更，拒绝结束"
                );
                return Err(AppError::process(format!(
                    "进程 {} 已不是 {}，未结束",
                    pid, expected_name
                )));
            }
            if process.kill() {
                tracing::info!(pid = pid.as_u32(), process = %name, "已结束进程");
                Ok(())
            } else {
                Err(AppError::process(format!("无法结束进程 {} ({})", name, pid)))
            }
        }
        None => {
            tracing::warn!(pid = pid.as_u32(), "进程已退出，无需结束");
            Ok(())
        }
    }
}

/// 合并采样与告警判定，生成对外发布的快照
pub fn build_snapshot(
    monitor: &Mutex<MemoryMonitor>,
    memory: &MemorySample,
    mut snapshot: SystemSnapshot,
    now: Instant,
) -> SystemSnapshot {
    let decision = monitor
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .evaluate(memory, now);
    snapshot.memory_usage = decision.usage;
    snapshot.high_memory_alert = decision.high_memory_alert;
    snapshot.offending_process = decision.offender;
    snapshot
}

/// 采样循环，随应用进程一直运行
pub async fn run_sampler(
    hub: Arc<MetricsHub>,
    monitor: Arc<Mutex<MemoryMonitor>>,
    interval: Duration,
) {
    let sampler = Arc::new(Mutex::new(SysinfoSampler::new()));
    let mut ticker = time::interval(interval);
    tracing::info!(interval_secs = interval.as_secs(), "系统采样已启动");

    loop {
        ticker.tick().await;

        let sampler = sampler.clone();
        let collected = tokio::task::spawn_blocking(move || {
            sampler
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .collect()
        })
        .await;

        match collected {
            Ok((memory, snapshot)) => {
                let snapshot = build_snapshot(&monitor, &memory, snapshot, Instant::now());
                if snapshot.high_memory_alert {
                    tracing::debug!(
                        usage = snapshot.memory_usage,
                        process = ?snapshot.offending_process.as_ref().map(|p| &p.name),
                        "内存占用过高"
                    );
                }
                hub.publish(snapshot);
            }
            Err(e) => tracing::error!(error = %e, "系统采样任务失败"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_snapshot_applies_decision() {
        let monitor = Mutex::new(MemoryMonitor::new(0.5));
        let memory = MemorySample {
            used_bytes: 9,
            total_bytes: 10,
            processes: vec![ProcessSample {
                pid: 99,
                name: "Docker".to_string(),
                exe: None,
                memory_bytes: 5,
            }],
        };

        let snapshot = build_snapshot(&monitor, &memory, SystemSnapshot::default(), Instant::now());
        assert!(snapshot.high_memory_alert);
        assert!((snapshot.memory_usage - 0.9).abs() < 1e-9);
        assert_eq!(snapshot.offending_process.map(|p| p.pid), Some(99));
    }

    #[test]
    fn test_collect_reports_memory() {
        let mut sampler = SysinfoSampler::new();
        let (memory, snapshot) = sampler.collect();
        assert!(memory.total_bytes > 0);
        assert!(memory.used_bytes <= memory.total_bytes);
        assert!(snapshot.memory_usage >= 0.0 && snapshot.memory_usage <= 1.0);
        assert!(!snapshot.high_memory_alert);
    }

    #[test]
    fn test_terminate_missing_process_is_ok() {
        // 超过 Linux pid_max 上限（2^22），也远大于 macOS 的 99998
        assert!(terminate_process(4_194_305, "Google Chrome").is_ok());
    }

    #[test]
    fn test_terminate_refuses_reused_pid() {
        // 名称不符时在 kill 之前返回，测试进程自身不会被结束
        let result = terminate_process(std::process::id(), "no-such-process-name");
        assert!(matches!(result, Err(AppError::Process(_))));
    }
}
