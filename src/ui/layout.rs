//! 浮动窗口尺寸与定位计算
//!
//! 纯函数，不接触真实窗口；坐标约定见 [`super::geometry`]。

use serde::Serialize;

use super::geometry::{clamp_axis, Point, Rect, ScreenInfo, Size};
use super::host::{Fade, FadeCurve};

pub const OVERVIEW_SIZE: Size = Size::new(360.0, 520.0);
pub const DETAIL_SIZE: Size = Size::new(340.0, 520.0);
pub const ALERT_SIZE: Size = Size::new(340.0, 168.0);

/// 概览窗口与屏幕边缘、菜单栏之间的留白
pub const PANEL_PADDING: f64 = 8.0;
/// 详情窗口与概览窗口之间的间距
pub const DETAIL_GAP: f64 = 8.0;

pub const PANEL_FADE_IN: Fade = Fade::new(200, FadeCurve::EaseOut);
pub const PANEL_FADE_OUT: Fade = Fade::new(150, FadeCurve::Linear);
pub const ALERT_FADE_IN: Fade = Fade::new(300, FadeCurve::EaseOut);
pub const ALERT_FADE_OUT: Fade = Fade::new(200, FadeCurve::Linear);

/// 提醒窗口顶部与菜单栏底部的距离
pub const ALERT_TOP_GAP: f64 = 6.0;
/// 图标坐标 x 小于该值视为异常
pub const ICON_MIN_X: f64 = 10.0;
/// 指针距菜单栏底部的容差
pub const MENU_BAR_TOLERANCE: f64 = 5.0;
/// 估算图标位置时距屏幕右边缘的偏移
pub const ICON_SLOT_OFFSET: f64 = 120.0;
/// 兜底贴右上角时的边距
pub const ALERT_CORNER_MARGIN: f64 = 12.0;

/// 概览窗口：右对齐到状态栏图标下方
pub fn overview_origin(screen: &ScreenInfo, icon: Option<Rect>, size: Size) -> Point {
    let visible = screen.visible_frame;
    let min_x = visible.min_x() + PANEL_PADDING;
    let max_x = visible.max_x() - size.width - PANEL_PADDING;
    let x = match icon {
        Some(icon) => clamp_axis(icon.max_x() - size.width, min_x, max_x),
        None => clamp_axis(max_x, min_x, max_x),
    };
    Point::new(x, visible.min_y() + PANEL_PADDING)
}

/// 详情窗口：贴在概览窗口左侧，顶部对齐
pub fn detail_origin(screen: &ScreenInfo, overview: Rect, size: Size) -> Point {
    let x = overview.min_x() - DETAIL_GAP - size.width;
    Point::new(x.max(screen.visible_frame.min_x()), overview.min_y())
}

/// 提醒窗口最终采用的定位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    StatusIcon,
    Pointer,
    RightEdgeEstimate,
    TopRightCorner,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPlacement {
    pub origin: Point,
    pub source: AnchorSource,
}

/// 方法 1：状态栏图标。位于可见区域中线以下或 x 过小都说明参考坐标不可信。
fn anchor_from_icon(screen: &ScreenInfo, icon: Option<Rect>) -> Option<f64> {
    let icon = icon?;
    if icon.mid_y() > screen.visible_frame.mid_y() || icon.min_x() < ICON_MIN_X {
        return None;
    }
    Some(icon.mid_x())
}

/// 方法 2：指针位于顶部菜单栏区域时，用户多半刚点过图标
fn anchor_from_pointer(screen: &ScreenInfo, cursor: Option<Point>) -> Option<f64> {
    let cursor = cursor?;
    let band_bottom = screen.frame.min_y() + screen.menu_bar_height + MENU_BAR_TOLERANCE;
    if cursor.y >= screen.frame.min_y() && cursor.y <= band_bottom {
        Some(cursor.x)
    } else {
        None
    }
}

/// 方法 3：按常见图标槽位估算
fn anchor_from_right_edge(screen: &ScreenInfo) -> Option<f64> {
    let estimate = screen.frame.max_x() - ICON_SLOT_OFFSET;
    (estimate > screen.visible_frame.min_x()).then_some(estimate)
}

fn alert_top(screen: &ScreenInfo, size: Size) -> f64 {
    let visible = screen.visible_frame;
    let below_menu_bar = screen.frame.min_y() + screen.menu_bar_height + ALERT_TOP_GAP;
    clamp_axis(below_menu_bar, visible.min_y(), visible.max_y() - size.height)
}

pub fn place_alert(
    screen: &ScreenInfo,
    icon: Option<Rect>,
    cursor: Option<Point>,
    size: Size,
) -> AlertPlacement {
    let visible = screen.visible_frame;

    let anchor = anchor_from_icon(screen, icon)
        .map(|x| (x, AnchorSource::StatusIcon))
        .or_else(|| anchor_from_pointer(screen, cursor).map(|x| (x, AnchorSource::Pointer)))
        .or_else(|| anchor_from_right_edge(screen).map(|x| (x, AnchorSource::RightEdgeEstimate)));

    match anchor {
        Some((anchor_x, source)) => {
            let x = clamp_axis(
                anchor_x - size.width / 2.0,
                visible.min_x(),
                visible.max_x() - size.width,
            );
            AlertPlacement {
                origin: Point::new(x, alert_top(screen, size)),
                source,
            }
        }
        None => {
            let x = clamp_axis(
                visible.max_x() - size.width - ALERT_CORNER_MARGIN,
                visible.min_x(),
                visible.max_x() - size.width,
            );
            let y = clamp_axis(
                visible.min_y() + ALERT_CORNER_MARGIN,
                visible.min_y(),
                visible.max_y() - size.height,
            );
            AlertPlacement {
                origin: Point::new(x, y),
                source: AnchorSource::TopRightCorner,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::host::testing::laptop_screen;

    fn icon_at(x: f64) -> Rect {
        Rect::new(x, 0.0, 24.0, 24.0)
    }

    #[test]
    fn test_overview_right_aligned_under_icon() {
        let screen = laptop_screen();
        let origin = overview_origin(&screen, Some(icon_at(1000.0)), OVERVIEW_SIZE);
        assert_eq!(origin.x, 1024.0 - OVERVIEW_SIZE.width);
        assert_eq!(origin.y, 25.0 + PANEL_PADDING);
    }

    #[test]
    fn test_overview_clamped_to_right_edge() {
        let screen = laptop_screen();
        let origin = overview_origin(&screen, Some(icon_at(1430.0)), OVERVIEW_SIZE);
        assert_eq!(origin.x, 1440.0 - OVERVIEW_SIZE.width - PANEL_PADDING);
    }

    #[test]
    fn test_overview_without_icon() {
        let screen = laptop_screen();
        let origin = overview_origin(&screen, None, OVERVIEW_SIZE);
        assert_eq!(origin.x, 1440.0 - OVERVIEW_SIZE.width - PANEL_PADDING);
    }

    #[test]
    fn test_detail_left_of_overview() {
        let screen = laptop_screen();
        let overview = Rect::new(1000.0, 33.0, OVERVIEW_SIZE.width, OVERVIEW_SIZE.height);
        let origin = detail_origin(&screen, overview, DETAIL_SIZE);
        assert_eq!(origin.x, 1000.0 - DETAIL_GAP - DETAIL_SIZE.width);
        assert_eq!(origin.y, 33.0);

        let near_left = Rect::new(100.0, 33.0, OVERVIEW_SIZE.width, OVERVIEW_SIZE.height);
        assert_eq!(detail_origin(&screen, near_left, DETAIL_SIZE).x, 0.0);
    }

    #[test]
    fn test_alert_centered_under_icon() {
        let screen = laptop_screen();
        let placement = place_alert(&screen, Some(icon_at(1000.0)), None, ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::StatusIcon);
        assert_eq!(placement.origin.x, 1012.0 - ALERT_SIZE.width / 2.0);
        assert_eq!(placement.origin.y, 25.0 + ALERT_TOP_GAP);
    }

    #[test]
    fn test_alert_icon_below_midpoint_falls_back_to_pointer() {
        let screen = laptop_screen();
        let bogus_icon = Rect::new(700.0, 600.0, 24.0, 24.0);
        let cursor = Point::new(900.0, 12.0);
        let placement = place_alert(&screen, Some(bogus_icon), Some(cursor), ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::Pointer);
        assert_eq!(placement.origin.x, 900.0 - ALERT_SIZE.width / 2.0);
    }

    #[test]
    fn test_alert_icon_with_tiny_x_is_rejected() {
        let screen = laptop_screen();
        let placement = place_alert(&screen, Some(icon_at(2.0)), None, ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::RightEdgeEstimate);
    }

    #[test]
    fn test_alert_pointer_outside_menu_bar_band() {
        let screen = laptop_screen();
        let edge = Point::new(900.0, 25.0 + MENU_BAR_TOLERANCE);
        let placement = place_alert(&screen, None, Some(edge), ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::Pointer);

        let below = Point::new(900.0, 25.0 + MENU_BAR_TOLERANCE + 1.0);
        let placement = place_alert(&screen, None, Some(below), ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::RightEdgeEstimate);
        assert_eq!(
            placement.origin.x,
            1440.0 - ALERT_SIZE.width
        );
    }

    #[test]
    fn test_alert_top_right_corner_on_narrow_screen() {
        let screen = ScreenInfo {
            frame: Rect::new(0.0, 0.0, 100.0, 300.0),
            visible_frame: Rect::new(0.0, 25.0, 100.0, 275.0),
            menu_bar_height: 25.0,
        };
        let placement = place_alert(&screen, None, None, Size::new(60.0, 40.0));
        assert_eq!(placement.source, AnchorSource::TopRightCorner);
        assert_eq!(placement.origin.x, 100.0 - 60.0 - ALERT_CORNER_MARGIN);
        assert_eq!(placement.origin.y, 25.0 + ALERT_CORNER_MARGIN);
    }

    #[test]
    fn test_alert_clamped_inside_visible_frame() {
        let screen = laptop_screen();
        let placement = place_alert(&screen, Some(icon_at(20.0)), None, ALERT_SIZE);
        assert_eq!(placement.source, AnchorSource::StatusIcon);
        assert_eq!(placement.origin.x, 0.0);
    }
}
