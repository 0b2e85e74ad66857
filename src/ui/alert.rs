//! 内存提醒浮窗
//!
//! 内存监控检测到占用过高时，在状态栏图标附近弹出提醒，与概览窗口是否打开无关。

use std::time::Duration;

use super::host::{AfterFade, WindowContent, WindowHost, WindowId, WindowMessage, WindowSpec};
use super::layout::{place_alert, ALERT_FADE_IN, ALERT_FADE_OUT, ALERT_SIZE};
use crate::error::AppResult;
use crate::models::{AlertAction, OffendingProcess, SystemSnapshot};

pub const ALERT_LABEL: &str = "memory-alert";

/// 内存监控方提供的操作，进程参数均为提醒窗口正在展示的进程
pub trait MonitorActions {
    /// 在 `duration` 内不再因该进程提醒
    fn snooze(&self, process: &OffendingProcess, duration: Duration);

    fn ignore_permanently(&self, process: &OffendingProcess);

    fn terminate_offending_process(&self, process: &OffendingProcess) -> AppResult<()>;

    /// 收起菜单栏界面并激活主程序窗口
    fn open_main_application(&self);
}

pub struct MemoryAlertController<H: WindowHost, A: MonitorActions> {
    host: H,
    actions: A,
    created: bool,
    visible: bool,
    process: Option<OffendingProcess>,
    last_alert_pid: Option<u32>,
}

impl<H: WindowHost, A: MonitorActions> MemoryAlertController<H, A> {
    pub fn new(host: H, actions: A) -> Self {
        Self {
            host,
            actions,
            created: false,
            visible: false,
            process: None,
            last_alert_pid: None,
        }
    }

    fn id() -> WindowId {
        WindowId::new(ALERT_LABEL)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn process(&self) -> Option<&OffendingProcess> {
        self.process.as_ref()
    }

    /// 根据最新快照显示或收起提醒
    ///
    /// 只在告警标志上升沿（或触发进程变化）时弹出，用户关掉后同一轮告警不会反复弹出。
    pub fn on_snapshot(&mut self, snapshot: &SystemSnapshot) {
        let offender = snapshot
            .offending_process
            .as_ref()
            .filter(|_| snapshot.high_memory_alert);
        match offender {
            Some(process) => {
                if self.last_alert_pid != Some(process.pid) {
                    self.show(process.clone());
                }
                self.last_alert_pid = Some(process.pid);
            }
            None => {
                self.last_alert_pid = None;
                self.dismiss();
            }
        }
    }

    pub fn show(&mut self, process: OffendingProcess) {
        let id = Self::id();

        if self.visible {
            if self.process.as_ref() != Some(&process) {
                self.host.send(&id, WindowMessage::AlertProcess(process.clone()));
                self.process = Some(process);
            }
            return;
        }

        if !self.created {
            let spec = WindowSpec {
                id: id.clone(),
                content: WindowContent::MemoryAlert,
                size: ALERT_SIZE,
            };
            if let Err(e) = self.host.create_window(&spec) {
                tracing::warn!(error = %e, "创建内存提醒窗口失败");
                return;
            }
            self.created = true;
        }

        match self.host.primary_screen() {
            Some(screen) => {
                let placement = place_alert(
                    &screen,
                    self.host.status_icon_frame(),
                    self.host.cursor_position(),
                    ALERT_SIZE,
                );
                tracing::debug!(
                    source = ?placement.source,
                    x = placement.origin.x,
                    y = placement.origin.y,
                    "内存提醒窗口定位"
                );
                self.host.set_origin(&id, placement.origin);
            }
            None => tracing::debug!("未获取到主屏幕，跳过内存提醒窗口定位"),
        }

        self.host
            .send(&id, WindowMessage::AlertProcess(process.clone()));
        self.host.fade_in(&id, ALERT_FADE_IN);
        tracing::info!(
            process = %process.name,
            pid = process.pid,
            memory_mb = process.memory_bytes / 1_048_576,
            "显示内存占用提醒"
        );
        self.process = Some(process);
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.host
            .fade_out(&Self::id(), ALERT_FADE_OUT, AfterFade::Hide);
        tracing::debug!("内存提醒已收起");
    }

    /// 执行提醒窗口上的按钮操作，执行后提醒收起。
    ///
    /// 稍后提醒 / 忽略 / 结束只作用于窗口上展示的进程；提醒未显示时这些操作不做任何事。
    pub fn perform(&mut self, action: AlertAction) -> AppResult<()> {
        tracing::info!(action = ?action, "内存提醒操作");
        let shown = if self.visible { self.process.clone() } else { None };

        let result = match (action, shown) {
            (AlertAction::OpenMainApp, _) => {
                self.dismiss();
                self.actions.open_main_application();
                Ok(())
            }
            (_, None) => {
                tracing::debug!(action = ?action, "提醒未显示，忽略操作");
                Ok(())
            }
            (AlertAction::SnoozeShort | AlertAction::SnoozeLong, Some(process)) => {
                if let Some(duration) = action.snooze_duration() {
                    self.actions.snooze(&process, duration);
                }
                Ok(())
            }
            (AlertAction::IgnoreForever, Some(process)) => {
                self.actions.ignore_permanently(&process);
                Ok(())
            }
            (AlertAction::Terminate, Some(process)) => {
                self.actions.terminate_offending_process(&process)
            }
        };
        self.dismiss();
        result
    }
}
