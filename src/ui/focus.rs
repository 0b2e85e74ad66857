//! 面板自动关闭
//!
//! 无边框自定义窗口没有系统弹出框的自动消失行为，这里合并三路信号：
//! 全局鼠标按下、窗口失去键盘焦点、应用失活。三者都走同一条可重入的关闭路径，
//! 不依赖触发顺序。

use super::alert::ALERT_LABEL;
use super::geometry::Point;
use super::host::{WindowHost, WindowId};
use super::window_manager::{PanelState, WindowManager};

#[derive(Debug, Clone, PartialEq)]
pub enum FocusSignal {
    /// 全局（本应用之外）鼠标按下
    MouseDown { at: Point },
    /// 某个窗口失去键盘焦点
    ResignedKey { window: WindowId },
    /// 用户切换到了其他应用
    AppDeactivated,
}

#[derive(Debug, Default)]
pub struct FocusTracker {
    dismissals: u64,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自动关闭的累计次数
    pub fn dismissals(&self) -> u64 {
        self.dismissals
    }

    /// 处理一路信号，返回是否因此关闭了面板
    pub fn handle<H: WindowHost>(
        &mut self,
        signal: &FocusSignal,
        manager: &mut WindowManager<H>,
    ) -> bool {
        if manager.panel_state() == PanelState::Closed {
            return false;
        }

        let should_close = match signal {
            FocusSignal::MouseDown { at } => {
                !manager.panel_frames().iter().any(|frame| frame.contains(*at))
            }
            // 内存提醒浮窗与面板互不影响，焦点落到它上面不算离开面板
            FocusSignal::ResignedKey { window } => {
                manager.owns(window)
                    && !manager
                        .host()
                        .key_window()
                        .map(|key| manager.owns(&key) || key.as_str() == ALERT_LABEL)
                        .unwrap_or(false)
            }
            FocusSignal::AppDeactivated => true,
        };

        if !should_close {
            return false;
        }

        let closed = manager.close_all();
        if closed {
            self.dismissals += 1;
            tracing::debug!(signal = ?signal, "交互移出面板，自动关闭");
        }
        closed
    }
}
