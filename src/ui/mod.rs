pub mod alert;
pub mod focus;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod window_manager;

// 导出窗口管理类型
pub use window_manager::{PanelState, WindowManager, OVERVIEW_LABEL};

// 导出自动关闭与内存提醒
pub use alert::{MemoryAlertController, MonitorActions, ALERT_LABEL};
pub use focus::{FocusSignal, FocusTracker};

// 导出宿主抽象
pub use geometry::{Point, Rect, ScreenInfo, Size};
pub use host::{AfterFade, Fade, FadeCurve, WindowContent, WindowHost, WindowId, WindowMessage, WindowSpec};
