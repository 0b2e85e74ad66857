//! 概览 / 详情窗口管理器
//!
//! 负责概览窗口的显隐切换，以及挂在概览窗口左侧的详情窗口的创建、原地换页与关闭。
//! 任意时刻最多一个概览窗口、一个详情窗口。

use super::geometry::Rect;
use super::host::{AfterFade, WindowContent, WindowHost, WindowId, WindowMessage, WindowSpec};
use super::layout::{
    detail_origin, overview_origin, DETAIL_SIZE, OVERVIEW_SIZE, PANEL_FADE_IN, PANEL_FADE_OUT,
};
use crate::models::Route;

pub const OVERVIEW_LABEL: &str = "overview";
const DETAIL_LABEL_PREFIX: &str = "detail-";

/// 概览窗口：首次切换时创建，之后只改变可见性
#[derive(Debug)]
struct OverviewWindow {
    id: WindowId,
    visible: bool,
}

#[derive(Debug)]
struct DetailWindow {
    id: WindowId,
    route: Route,
}

/// 面板整体状态，供自动关闭逻辑判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Open,
    Closed,
}

pub struct WindowManager<H: WindowHost> {
    host: H,
    overview: Option<OverviewWindow>,
    detail: Option<DetailWindow>,
    detail_seq: u64,
}

impl<H: WindowHost> WindowManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            overview: None,
            detail: None,
            detail_seq: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_overview_visible(&self) -> bool {
        self.overview.as_ref().map(|o| o.visible).unwrap_or(false)
    }

    pub fn detail_route(&self) -> Option<Route> {
        self.detail.as_ref().map(|d| d.route)
    }

    pub fn panel_state(&self) -> PanelState {
        if self.is_overview_visible() || self.detail.is_some() {
            PanelState::Open
        } else {
            PanelState::Closed
        }
    }

    /// 窗口是否属于概览 / 详情这一对
    pub fn owns(&self, id: &WindowId) -> bool {
        self.overview.as_ref().map(|o| &o.id == id).unwrap_or(false)
            || self.detail.as_ref().map(|d| &d.id == id).unwrap_or(false)
    }

    /// 当前可见面板的屏幕区域
    pub fn panel_frames(&self) -> Vec<Rect> {
        let mut frames = Vec::with_capacity(2);
        if let Some(overview) = self.overview.as_ref().filter(|o| o.visible) {
            frames.extend(self.host.frame(&overview.id));
        }
        if let Some(detail) = &self.detail {
            frames.extend(self.host.frame(&detail.id));
        }
        frames
    }

    pub fn toggle_overview(&mut self) {
        if self.is_overview_visible() {
            self.close_overview();
        } else {
            self.show_overview();
        }
    }

    pub fn show_overview(&mut self) {
        if self.is_overview_visible() {
            return;
        }

        let id = match &self.overview {
            Some(overview) => overview.id.clone(),
            None => {
                let id = WindowId::new(OVERVIEW_LABEL);
                let spec = WindowSpec {
                    id: id.clone(),
                    content: WindowContent::Panel(Route::Overview),
                    size: OVERVIEW_SIZE,
                };
                if let Err(e) = self.host.create_window(&spec) {
                    tracing::warn!(error = %e, "创建概览窗口失败");
                    return;
                }
                self.overview = Some(OverviewWindow {
                    id: id.clone(),
                    visible: false,
                });
                id
            }
        };

        // 没有屏幕信息时保留窗口默认位置
        match self.host.primary_screen() {
            Some(screen) => {
                let icon = self.host.status_icon_frame();
                let origin = overview_origin(&screen, icon, OVERVIEW_SIZE);
                self.host.set_origin(&id, origin);
            }
            None => tracing::debug!("未获取到主屏幕，跳过概览窗口定位"),
        }

        self.host.fade_in(&id, PANEL_FADE_IN);
        if let Some(overview) = self.overview.as_mut() {
            overview.visible = true;
        }
        tracing::debug!("概览窗口已显示");
    }

    /// 关闭概览窗口，先强制关闭详情窗口
    pub fn close_overview(&mut self) {
        self.close_detail();

        if let Some(overview) = self.overview.as_mut().filter(|o| o.visible) {
            overview.visible = false;
            self.host
                .fade_out(&overview.id, PANEL_FADE_OUT, AfterFade::Hide);
            tracing::debug!("概览窗口已隐藏");
        }
    }

    pub fn show_detail(&mut self, route: Route) {
        if let Some(detail) = self.detail.as_mut() {
            if detail.route == route {
                return;
            }
            // 原地换页，避免销毁重建造成闪烁，也不重新定位
            detail.route = route;
            self.host.send(&detail.id, WindowMessage::Navigate(route));
            tracing::debug!(route = route.as_str(), "详情窗口切换页面");
            return;
        }

        self.detail_seq += 1;
        let id = WindowId::new(format!("{}{}", DETAIL_LABEL_PREFIX, self.detail_seq));
        let spec = WindowSpec {
            id: id.clone(),
            content: WindowContent::Panel(route),
            size: DETAIL_SIZE,
        };
        if let Err(e) = self.host.create_window(&spec) {
            tracing::warn!(error = %e, route = route.as_str(), "创建详情窗口失败");
            return;
        }

        let overview_frame = self
            .overview
            .as_ref()
            .filter(|o| o.visible)
            .and_then(|o| self.host.frame(&o.id));
        match (self.host.primary_screen(), overview_frame) {
            (Some(screen), Some(overview)) => {
                let origin = detail_origin(&screen, overview, DETAIL_SIZE);
                self.host.set_origin(&id, origin);
            }
            _ => tracing::debug!("缺少屏幕或概览窗口位置，跳过详情窗口定位"),
        }

        self.host.fade_in(&id, PANEL_FADE_IN);
        self.detail = Some(DetailWindow { id, route });
        tracing::debug!(route = route.as_str(), "详情窗口已显示");
    }

    pub fn close_detail(&mut self) {
        if let Some(detail) = self.detail.take() {
            self.host
                .fade_out(&detail.id, PANEL_FADE_OUT, AfterFade::Destroy);
            tracing::debug!(route = detail.route.as_str(), "详情窗口已关闭");
        }
    }

    /// 关闭全部面板；可重复调用，返回本次是否真的关闭了窗口
    pub fn close_all(&mut self) -> bool {
        if self.panel_state() == PanelState::Closed {
            return false;
        }
        self.close_overview();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::host::testing::{laptop_screen, FakeHost};

    fn manager() -> (WindowManager<FakeHost>, FakeHost) {
        let host = FakeHost::with_screen(laptop_screen());
        host.set_icon(Some(Rect::new(1000.0, 0.0, 24.0, 24.0)));
        (WindowManager::new(host.clone()), host)
    }

    fn overview_id() -> WindowId {
        WindowId::new(OVERVIEW_LABEL)
    }

    #[test]
    fn test_toggle_twice_returns_to_hidden() {
        let (mut manager, host) = manager();
        assert_eq!(manager.panel_state(), PanelState::Closed);

        manager.toggle_overview();
        assert!(manager.is_overview_visible());
        assert!(host.is_visible(&overview_id()));

        manager.toggle_overview();
        assert!(!manager.is_overview_visible());
        assert!(!host.is_visible(&overview_id()));
        assert_eq!(manager.panel_state(), PanelState::Closed);
    }

    #[test]
    fn test_overview_created_once_and_reused() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.toggle_overview();
        manager.toggle_overview();
        assert_eq!(host.created_count(), 1);
        assert!(!host.is_destroyed(&overview_id()));
    }

    #[test]
    fn test_overview_positioned_under_icon() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        let frame = host.frame(&overview_id()).unwrap();
        assert_eq!(frame.max_x(), 1024.0);
    }

    #[test]
    fn test_no_screen_skips_positioning() {
        let host = FakeHost::default();
        let mut manager = WindowManager::new(host.clone());
        manager.toggle_overview();
        assert!(manager.is_overview_visible());
        assert_eq!(host.frame(&overview_id()).unwrap().origin.x, 0.0);
    }

    #[test]
    fn test_same_route_is_noop() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.show_detail(Route::Memory);
        let created = host.created_count();

        manager.show_detail(Route::Memory);
        assert_eq!(host.created_count(), created);
        let detail = host.window(&WindowId::new("detail-1")).unwrap();
        assert!(detail.messages.is_empty());
        assert_eq!(detail.fades.len(), 1);
    }

    #[test]
    fn test_different_route_swaps_in_place() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.show_detail(Route::Memory);
        let detail_id = WindowId::new("detail-1");
        let origin_before = host.frame(&detail_id).unwrap().origin;

        manager.show_detail(Route::Network);
        assert_eq!(host.created_count(), 2);
        assert!(!host.is_destroyed(&detail_id));
        assert_eq!(manager.detail_route(), Some(Route::Network));

        let detail = host.window(&detail_id).unwrap();
        assert_eq!(detail.messages, vec![WindowMessage::Navigate(Route::Network)]);
        assert_eq!(detail.frame.origin, origin_before);
    }

    #[test]
    fn test_detail_anchored_left_of_overview() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.show_detail(Route::Storage);
        let overview = host.frame(&overview_id()).unwrap();
        let detail = host.frame(&WindowId::new("detail-1")).unwrap();
        assert_eq!(detail.max_x() + crate::ui::layout::DETAIL_GAP, overview.min_x());
        assert_eq!(detail.min_y(), overview.min_y());
    }

    #[test]
    fn test_closing_overview_closes_detail_first() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.show_detail(Route::Cpu);

        manager.toggle_overview();
        assert!(host.is_destroyed(&WindowId::new("detail-1")));
        assert_eq!(manager.detail_route(), None);
        assert!(!manager.is_overview_visible());

        let state = host.state.borrow();
        assert_eq!(state.destroyed.len(), 1);
        let overview = state.windows.get(&overview_id()).unwrap();
        assert_eq!(overview.fades.last().unwrap().1, Some(AfterFade::Hide));
        drop(state);

        // 详情窗口先于概览窗口淡出
        let ops = host.ops();
        let fade_out_at = |id: &WindowId| {
            ops.iter()
                .rposition(|(window, op)| window == id && *op == "fade-out")
                .unwrap()
        };
        assert!(fade_out_at(&WindowId::new("detail-1")) < fade_out_at(&overview_id()));
    }

    #[test]
    fn test_reopened_detail_gets_fresh_window() {
        let (mut manager, host) = manager();
        manager.toggle_overview();
        manager.show_detail(Route::Battery);
        manager.close_detail();
        manager.show_detail(Route::Battery);
        assert!(host.window(&WindowId::new("detail-2")).is_some());
        assert_eq!(manager.detail_route(), Some(Route::Battery));
    }

    #[test]
    fn test_close_all_is_idempotent() {
        let (mut manager, _host) = manager();
        assert!(!manager.close_all());
        manager.toggle_overview();
        manager.show_detail(Route::Memory);
        assert!(manager.close_all());
        assert!(!manager.close_all());
        assert_eq!(manager.panel_state(), PanelState::Closed);
    }

    #[test]
    fn test_create_failure_is_skipped() {
        let (mut manager, host) = manager();
        host.state.borrow_mut().fail_create = true;
        manager.toggle_overview();
        assert!(!manager.is_overview_visible());
        assert_eq!(manager.panel_state(), PanelState::Closed);
    }
}
