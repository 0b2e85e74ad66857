use macmaster::error::{AppError, AppResult};
use macmaster::models::{AlertAction, Route};
use tauri::AppHandle;

use crate::setup::initialization::{with_alert, with_windows};

/// 显示或隐藏概览窗口（与点击状态栏图标相同）
#[tauri::command]
pub async fn toggle_overview(app: AppHandle) -> AppResult<()> {
    with_windows(&app, |manager| manager.toggle_overview()).await
}

/// 打开详情窗口
///
/// # 参数
/// - `route`: 详情页面 ("storage" / "memory" / "battery" / "cpu" / "network"，可带前导 `/`)
#[tauri::command]
pub async fn show_detail(app: AppHandle, route: String) -> AppResult<()> {
    let route = Route::parse(&route)
        .ok_or_else(|| AppError::validation("route", format!("未知的页面: {}", route)))?;
    with_windows(&app, move |manager| manager.show_detail(route)).await
}

#[tauri::command]
pub async fn close_detail(app: AppHandle) -> AppResult<()> {
    with_windows(&app, |manager| manager.close_detail()).await
}

/// 关闭概览和详情窗口，返回调用前是否有面板打开
#[tauri::command]
pub async fn close_panels(app: AppHandle) -> AppResult<bool> {
    with_windows(&app, |manager| manager.close_all()).await
}

/// 收起面板和内存提醒并打开主程序
#[tauri::command]
pub async fn open_main_app(app: AppHandle) -> AppResult<()> {
    with_alert(&app, |alert| alert.perform(AlertAction::OpenMainApp)).await?
}
