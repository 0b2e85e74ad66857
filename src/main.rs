// 发布版不弹出控制台窗口（Windows）
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod setup;

use commands::{
    alert_current, alert_dismiss, alert_ignore, alert_snooze, alert_terminate, close_detail, close_panels,
    get_log_config, get_snapshot, is_release_build, open_main_app, show_detail, toggle_overview,
    update_log_config,
};
use tauri::{Manager, RunEvent, WindowEvent};

fn main() {
    let app = tauri::Builder::default()
        // 重复启动时切换概览窗口
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            tracing::info!("检测到重复启动");
            setup::post_to_windows(app, |manager| manager.toggle_overview());
        }))
        .setup(|app| {
            // 只驻留菜单栏，不显示 Dock 图标
            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            setup::initialize_app(app.handle())?;
            setup::schedule_status_icon(app.handle());

            #[cfg(target_os = "macos")]
            setup::macos::install_event_monitors(app.handle());

            Ok(())
        })
        .on_window_event(|window, event| match event {
            WindowEvent::Focused(false) => {
                setup::on_window_blur(window.app_handle(), window.label());
            }
            WindowEvent::CloseRequested { api, .. }
                if window.label() == setup::initialization::MAIN_WINDOW_LABEL =>
            {
                // 主窗口关闭时只隐藏
                api.prevent_close();
                let _ = window.hide();
            }
            _ => {}
        })
        .invoke_handler(tauri::generate_handler![
            // 面板窗口
            toggle_overview,
            show_detail,
            close_detail,
            close_panels,
            open_main_app,
            // 系统指标
            get_snapshot,
            // 内存提醒
            alert_current,
            alert_snooze,
            alert_ignore,
            alert_terminate,
            alert_dismiss,
            // 日志配置
            get_log_config,
            update_log_config,
            is_release_build,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|_app, event| match event {
        // 没有可见窗口时保持驻留
        RunEvent::ExitRequested { api, code, .. } if code.is_none() => {
            api.prevent_exit();
        }
        RunEvent::Exit => {
            tracing::info!("应用退出");
            #[cfg(target_os = "macos")]
            setup::macos::remove_event_monitors();
        }
        _ => {}
    });
}
