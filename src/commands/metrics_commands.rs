use macmaster::models::SystemSnapshot;
use tauri::State;

use crate::setup::initialization::MetricsState;

/// 最近一次系统快照，窗口加载后用它填充首屏
#[tauri::command]
pub fn get_snapshot(state: State<'_, MetricsState>) -> SystemSnapshot {
    state.hub.current()
}
