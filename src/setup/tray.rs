// 状态栏图标
//
// 应用启动初期状态栏可能尚未就绪，创建失败时按 RetryPolicy::STATUS_ICON 延迟重试

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Runtime,
};

use anyhow::Context;
use macmaster::utils::RetryPolicy;

use super::initialization::{post_open_main_app, post_to_windows, run_on_main};

pub const TRAY_ID: &str = "macmaster-status";

const ICON_SIZE: u32 = 22;

/// 仪表盘样式的模板图标：外圈加中心点，只用 alpha 通道
fn status_icon() -> Image<'static> {
    let center = (ICON_SIZE as f64 - 1.0) / 2.0;
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let distance = (dx * dx + dy * dy).sqrt();
            let ring = (7.5..=10.0).contains(&distance);
            let dot = distance <= 2.5;
            // 右下方缺口，像一块表盘
            let gap = dx > 2.0 && dy > 2.0;
            let alpha = if (ring && !gap) || dot { 255 } else { 0 };
            rgba.extend_from_slice(&[0, 0, 0, alpha]);
        }
    }
    Image::new_owned(rgba, ICON_SIZE, ICON_SIZE)
}

fn create_tray_menu<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<Menu<R>> {
    let open_item = MenuItem::with_id(app, "open-main", "打开 Mac优化大师", true, None::<&str>)?;
    let quit_item = MenuItem::with_id(app, "quit", "退出", true, None::<&str>)?;

    Menu::with_items(
        app,
        &[
            &open_item,
            &PredefinedMenuItem::separator(app)?,
            &quit_item,
        ],
    )
}

fn build_status_icon(app: &AppHandle) -> tauri::Result<()> {
    if app.tray_by_id(TRAY_ID).is_some() {
        return Ok(());
    }

    let menu = create_tray_menu(app)?;
    TrayIconBuilder::with_id(TRAY_ID)
        .icon(status_icon())
        .icon_as_template(true)
        .tooltip("Mac优化大师")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tracing::debug!(menu_id = %event.id.as_ref(), "状态栏菜单点击");
            match event.id.as_ref() {
                "open-main" => post_open_main_app(app),
                "quit" => {
                    tracing::info!("用户从状态栏退出应用");
                    app.exit(0);
                }
                _ => {}
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                post_to_windows(tray.app_handle(), |manager| manager.toggle_overview());
            }
        })
        .build(app)?;

    tracing::info!("状态栏图标已创建");
    Ok(())
}

async fn install_once(app: &AppHandle) -> anyhow::Result<()> {
    let handle = app.clone();
    run_on_main(app, move || build_status_icon(&handle))
        .await
        .context("无法调度到主线程")?
        .context("状态栏尚不可用")
}

/// 异步创建状态栏图标，失败时有限次重试
pub fn schedule_status_icon(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let result = RetryPolicy::STATUS_ICON
            .run("创建状态栏图标", |_attempt| install_once(&app))
            .await;
        if let Err(e) = result {
            tracing::error!(error = ?e, "状态栏图标创建失败，菜单栏功能不可用");
        }
    });
}
