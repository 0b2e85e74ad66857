// 内存提醒浮窗的按钮操作

use macmaster::error::{AppError, AppResult};
use macmaster::models::{AlertAction, OffendingProcess};
use tauri::AppHandle;

use crate::setup::initialization::with_alert;

/// 浮窗当前展示的进程
#[tauri::command]
pub async fn alert_current(app: AppHandle) -> AppResult<Option<OffendingProcess>> {
    with_alert(&app, |alert| alert.process().cloned()).await
}

/// 稍后提醒
///
/// # 参数
/// - `minutes`: 静默时长，只支持 10 或 60
#[tauri::command]
pub async fn alert_snooze(app: AppHandle, minutes: u64) -> AppResult<()> {
    let action = AlertAction::snooze_from_minutes(minutes).ok_or_else(|| {
        AppError::validation("minutes", format!("不支持的稍后提醒时长: {} 分钟", minutes))
    })?;
    with_alert(&app, move |alert| alert.perform(action)).await?
}

/// 永久忽略当前进程
#[tauri::command]
pub async fn alert_ignore(app: AppHandle) -> AppResult<()> {
    with_alert(&app, |alert| alert.perform(AlertAction::IgnoreForever)).await?
}

/// 结束占用内存的进程；失败时浮窗仍会关闭，错误返回给前端
#[tauri::command]
pub async fn alert_terminate(app: AppHandle) -> AppResult<()> {
    with_alert(&app, |alert| alert.perform(AlertAction::Terminate)).await?
}

/// 关闭浮窗，不做任何处理
#[tauri::command]
pub async fn alert_dismiss(app: AppHandle) -> AppResult<()> {
    with_alert(&app, |alert| alert.dismiss()).await
}
