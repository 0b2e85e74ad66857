//! 窗口宿主抽象
//!
//! 窗口管理逻辑只通过 [`WindowHost`] 操作真实窗口，应用里由 Tauri 实现，测试里由
//! 记录调用的假宿主实现。所有方法都应在主线程调用。

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::geometry::{Point, Rect, ScreenInfo, Size};
use crate::error::AppResult;
use crate::models::{OffendingProcess, Route};

/// 窗口标识（即 webview label）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 窗口加载的页面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowContent {
    Panel(Route),
    MemoryAlert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub id: WindowId,
    pub content: WindowContent,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurve {
    EaseOut,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    pub duration: Duration,
    pub curve: FadeCurve,
}

impl Fade {
    pub const fn new(millis: u64, curve: FadeCurve) -> Self {
        Self {
            duration: Duration::from_millis(millis),
            curve,
        }
    }
}

/// 淡出动画结束后的收尾动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterFade {
    /// 移出屏幕但保留窗口对象
    Hide,
    /// 释放窗口及其内容
    Destroy,
}

/// 发往窗口前端的消息
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMessage {
    /// 原地切换页面内容
    Navigate(Route),
    /// 更新提醒窗口展示的进程
    AlertProcess(OffendingProcess),
}

pub trait WindowHost {
    /// 创建隐藏的无边框浮动窗口
    fn create_window(&self, spec: &WindowSpec) -> AppResult<()>;

    fn set_origin(&self, id: &WindowId, origin: Point);

    fn frame(&self, id: &WindowId) -> Option<Rect>;

    fn send(&self, id: &WindowId, message: WindowMessage);

    /// 显示窗口并淡入，调用立即返回
    fn fade_in(&self, id: &WindowId, fade: Fade);

    /// 淡出，动画结束后执行 `after`，调用立即返回
    fn fade_out(&self, id: &WindowId, fade: Fade, after: AfterFade);

    /// 当前拥有键盘焦点的本应用窗口
    fn key_window(&self) -> Option<WindowId>;

    fn primary_screen(&self) -> Option<ScreenInfo>;

    /// 状态栏图标在屏幕上的位置
    fn status_icon_frame(&self) -> Option<Rect>;

    fn cursor_position(&self) -> Option<Point>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::error::AppError;

    #[derive(Debug, Clone)]
    pub struct FakeWindow {
        pub spec: WindowSpec,
        pub frame: Rect,
        pub visible: bool,
        pub messages: Vec<WindowMessage>,
        pub fades: Vec<(Fade, Option<AfterFade>)>,
    }

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub windows: HashMap<WindowId, FakeWindow>,
        pub created: Vec<WindowId>,
        pub destroyed: Vec<WindowId>,
        pub screen: Option<ScreenInfo>,
        pub icon: Option<Rect>,
        pub cursor: Option<Point>,
        pub key: Option<WindowId>,
        pub fail_create: bool,
        /// 按调用顺序记录的窗口操作
        pub ops: Vec<(WindowId, &'static str)>,
    }

    /// 立即完成动画的假宿主，克隆后共享同一份状态
    #[derive(Debug, Clone, Default)]
    pub struct FakeHost {
        pub state: Rc<RefCell<FakeState>>,
    }

    pub fn laptop_screen() -> ScreenInfo {
        ScreenInfo {
            frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
            visible_frame: Rect::new(0.0, 25.0, 1440.0, 800.0),
            menu_bar_height: 25.0,
        }
    }

    impl FakeHost {
        pub fn with_screen(screen: ScreenInfo) -> Self {
            let host = Self::default();
            host.state.borrow_mut().screen = Some(screen);
            host
        }

        pub fn set_icon(&self, icon: Option<Rect>) {
            self.state.borrow_mut().icon = icon;
        }

        pub fn set_cursor(&self, cursor: Option<Point>) {
            self.state.borrow_mut().cursor = cursor;
        }

        pub fn set_key(&self, key: Option<WindowId>) {
            self.state.borrow_mut().key = key;
        }

        pub fn created_count(&self) -> usize {
            self.state.borrow().created.len()
        }

        pub fn window(&self, id: &WindowId) -> Option<FakeWindow> {
            self.state.borrow().windows.get(id).cloned()
        }

        pub fn is_visible(&self, id: &WindowId) -> bool {
            self.window(id).map(|w| w.visible).unwrap_or(false)
        }

        pub fn is_destroyed(&self, id: &WindowId) -> bool {
            self.state.borrow().destroyed.contains(id)
        }

        pub fn ops(&self) -> Vec<(WindowId, &'static str)> {
            self.state.borrow().ops.clone()
        }
    }

    impl WindowHost for FakeHost {
        fn create_window(&self, spec: &WindowSpec) -> AppResult<()> {
            let mut state = self.state.borrow_mut();
            if state.fail_create {
                return Err(AppError::window("创建失败"));
            }
            state.created.push(spec.id.clone());
            state.ops.push((spec.id.clone(), "create"));
            state.windows.insert(
                spec.id.clone(),
                FakeWindow {
                    spec: spec.clone(),
                    frame: Rect::new(0.0, 0.0, spec.size.width, spec.size.height),
                    visible: false,
                    messages: Vec::new(),
                    fades: Vec::new(),
                },
            );
            Ok(())
        }

        fn set_origin(&self, id: &WindowId, origin: Point) {
            if let Some(window) = self.state.borrow_mut().windows.get_mut(id) {
                window.frame.origin = origin;
            }
        }

        fn frame(&self, id: &WindowId) -> Option<Rect> {
            self.state.borrow().windows.get(id).map(|w| w.frame)
        }

        fn send(&self, id: &WindowId, message: WindowMessage) {
            if let Some(window) = self.state.borrow_mut().windows.get_mut(id) {
                window.messages.push(message);
            }
        }

        fn fade_in(&self, id: &WindowId, fade: Fade) {
            let mut state = self.state.borrow_mut();
            if let Some(window) = state.windows.get_mut(id) {
                window.visible = true;
                window.fades.push((fade, None));
                state.ops.push((id.clone(), "fade-in"));
            }
        }

        fn fade_out(&self, id: &WindowId, fade: Fade, after: AfterFade) {
            let mut state = self.state.borrow_mut();
            if let Some(window) = state.windows.get_mut(id) {
                window.visible = false;
                window.fades.push((fade, Some(after)));
                state.ops.push((id.clone(), "fade-out"));
            }
            if after == AfterFade::Destroy && state.windows.remove(id).is_some() {
                state.destroyed.push(id.clone());
            }
        }

        fn key_window(&self) -> Option<WindowId> {
            self.state.borrow().key.clone()
        }

        fn primary_screen(&self) -> Option<ScreenInfo> {
            self.state.borrow().screen
        }

        fn status_icon_frame(&self) -> Option<Rect> {
            self.state.borrow().icon
        }

        fn cursor_position(&self) -> Option<Point> {
            self.state.borrow().cursor
        }
    }
}
