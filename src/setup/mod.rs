// 状态栏图标和菜单
pub mod tray;

// 启动初始化逻辑与托管状态
pub mod initialization;

// Tauri 窗口宿主
pub mod host;

// macOS 全局事件监听
#[cfg(target_os = "macos")]
pub mod macos;

// 重新导出常用函数供 main.rs 使用
pub use initialization::{initialize_app, on_window_blur, post_to_windows};
pub use tray::schedule_status_icon;
