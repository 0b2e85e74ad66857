//! Tauri 窗口宿主
//!
//! 用 webview 窗口实现 [`WindowHost`]。淡入淡出由前端 CSS 完成，这里只负责显示、
//! 通知前端开始动画，并在动画时长结束后隐藏或销毁窗口。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tauri::{
    AppHandle, Emitter, LogicalPosition, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder,
};

use macmaster::error::AppResult;
use macmaster::ui::{
    AfterFade, Fade, FadeCurve, Point, Rect, ScreenInfo, WindowContent, WindowHost, WindowId,
    WindowMessage, WindowSpec, ALERT_LABEL,
};

use super::tray::TRAY_ID;

pub const NAVIGATE_EVENT: &str = "navigate-to";
pub const FADE_EVENT: &str = "window://fade";
pub const ALERT_PROCESS_EVENT: &str = "alert://process";

#[derive(Serialize, Clone)]
struct FadePayload {
    direction: &'static str,
    duration_ms: u64,
    curve: FadeCurve,
}

impl FadePayload {
    fn new(direction: &'static str, fade: Fade) -> Self {
        Self {
            direction,
            duration_ms: fade.duration.as_millis() as u64,
            curve: fade.curve,
        }
    }
}

#[derive(Clone)]
pub struct TauriHost {
    app: AppHandle,
    /// 每个窗口的显隐代数；淡出完成时代数已变说明期间又被显示过，放弃收尾
    generations: Arc<Mutex<HashMap<String, u64>>>,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn window(&self, id: &WindowId) -> Option<WebviewWindow> {
        self.app.get_webview_window(id.as_str())
    }

    fn bump_generation(&self, id: &WindowId) -> u64 {
        let mut generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = generations.entry(id.as_str().to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn primary_scale(&self) -> f64 {
        self.app
            .primary_monitor()
            .ok()
            .flatten()
            .map(|m| m.scale_factor())
            .unwrap_or(1.0)
    }

    fn emit_to<S: Serialize + Clone>(&self, id: &WindowId, event: &str, payload: S) {
        if let Err(e) = self.app.emit_to(id.as_str(), event, payload) {
            tracing::warn!(window = %id, event, error = %e, "发送窗口事件失败");
        }
    }
}

/// 内存提醒不能成为键盘窗口，否则已打开的面板会因失去焦点而自动关闭。
/// macOS 的 `show` 走 `makeKeyAndOrderFront:`，这里改为只置前。
#[cfg(target_os = "macos")]
fn show_without_focus(window: &WebviewWindow) -> tauri::Result<()> {
    super::macos::order_front_regardless(window)
}

#[cfg(not(target_os = "macos"))]
fn show_without_focus(window: &WebviewWindow) -> tauri::Result<()> {
    window.show()
}

fn content_url(content: WindowContent) -> WebviewUrl {
    match content {
        WindowContent::Panel(route) => WebviewUrl::App(format!("index.html#{}", route.path()).into()),
        WindowContent::MemoryAlert => WebviewUrl::App("alert.html".into()),
    }
}

impl WindowHost for TauriHost {
    fn create_window(&self, spec: &WindowSpec) -> AppResult<()> {
        if self.window(&spec.id).is_some() {
            return Ok(());
        }

        // 提醒窗口不抢焦点
        let focused = !matches!(spec.content, WindowContent::MemoryAlert);
        WebviewWindowBuilder::new(&self.app, spec.id.as_str(), content_url(spec.content))
            .title("Mac优化大师")
            .inner_size(spec.size.width, spec.size.height)
            .decorations(false)
            .resizable(false)
            .always_on_top(true)
            .skip_taskbar(true)
            .visible(false)
            .focused(focused)
            .build()?;

        tracing::debug!(window = %spec.id, "已创建浮动窗口");
        Ok(())
    }

    fn set_origin(&self, id: &WindowId, origin: Point) {
        if let Some(window) = self.window(id) {
            if let Err(e) = window.set_position(LogicalPosition::new(origin.x, origin.y)) {
                tracing::warn!(window = %id, error = %e, "设置窗口位置失败");
            }
        }
    }

    fn frame(&self, id: &WindowId) -> Option<Rect> {
        let window = self.window(id)?;
        let scale = window.scale_factor().ok()?;
        let position = window.outer_position().ok()?.to_logical::<f64>(scale);
        let size = window.outer_size().ok()?.to_logical::<f64>(scale);
        Some(Rect::new(position.x, position.y, size.width, size.height))
    }

    fn send(&self, id: &WindowId, message: WindowMessage) {
        match message {
            WindowMessage::Navigate(route) => self.emit_to(id, NAVIGATE_EVENT, route.path()),
            WindowMessage::AlertProcess(process) => self.emit_to(id, ALERT_PROCESS_EVENT, process),
        }
    }

    fn fade_in(&self, id: &WindowId, fade: Fade) {
        let Some(window) = self.window(id) else {
            return;
        };
        self.bump_generation(id);

        let shown = if id.as_str() == ALERT_LABEL {
            show_without_focus(&window)
        } else {
            window.show().and_then(|_| window.set_focus())
        };
        if let Err(e) = shown {
            tracing::warn!(window = %id, error = %e, "显示窗口失败");
        }
        self.emit_to(id, FADE_EVENT, FadePayload::new("in", fade));
    }

    fn fade_out(&self, id: &WindowId, fade: Fade, after: AfterFade) {
        if self.window(id).is_none() {
            return;
        }
        let generation = self.bump_generation(id);
        self.emit_to(id, FADE_EVENT, FadePayload::new("out", fade));

        let app = self.app.clone();
        let generations = self.generations.clone();
        let label = id.as_str().to_string();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(fade.duration).await;
            let handle = app.clone();
            let result = app.run_on_main_thread(move || {
                let current = generations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&label)
                    .copied();
                if current != Some(generation) {
                    return;
                }
                let Some(window) = handle.get_webview_window(&label) else {
                    return;
                };
                let outcome = match after {
                    AfterFade::Hide => window.hide(),
                    AfterFade::Destroy => {
                        generations
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .remove(&label);
                        window.destroy()
                    }
                };
                if let Err(e) = outcome {
                    tracing::warn!(window = %label, error = %e, "淡出收尾失败");
                }
            });
            if let Err(e) = result {
                tracing::warn!(error = %e, "无法调度淡出收尾");
            }
        });
    }

    fn key_window(&self) -> Option<WindowId> {
        self.app
            .webview_windows()
            .into_iter()
            .find(|(_, window)| window.is_focused().unwrap_or(false))
            .map(|(label, _)| WindowId::new(label))
    }

    fn primary_screen(&self) -> Option<ScreenInfo> {
        let monitor = self.app.primary_monitor().ok().flatten()?;
        let scale = monitor.scale_factor();

        let position = monitor.position().to_logical::<f64>(scale);
        let size = monitor.size().to_logical::<f64>(scale);
        let frame = Rect::new(position.x, position.y, size.width, size.height);

        let work_area = monitor.work_area();
        let work_position = work_area.position.to_logical::<f64>(scale);
        let work_size = work_area.size.to_logical::<f64>(scale);
        let visible_frame = Rect::new(
            work_position.x,
            work_position.y,
            work_size.width,
            work_size.height,
        );

        Some(ScreenInfo {
            frame,
            visible_frame,
            menu_bar_height: (visible_frame.min_y() - frame.min_y()).max(0.0),
        })
    }

    fn status_icon_frame(&self) -> Option<Rect> {
        let tray = self.app.tray_by_id(TRAY_ID)?;
        let rect = tray.rect().ok().flatten()?;
        let scale = self.primary_scale();
        let position = rect.position.to_logical::<f64>(scale);
        let size = rect.size.to_logical::<f64>(scale);
        Some(Rect::new(position.x, position.y, size.width, size.height))
    }

    fn cursor_position(&self) -> Option<Point> {
        let cursor = self.app.cursor_position().ok()?;
        let logical = cursor.to_logical::<f64>(self.primary_scale());
        Some(Point::new(logical.x, logical.y))
    }
}
