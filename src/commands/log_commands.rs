// 日志配置管理命令
// 提供前端查询和更新日志配置的接口

use macmaster::models::LogConfig;
use macmaster::services::{read_app_config, write_app_config};
use tauri::command;

/// 检测当前是否为 Release 构建
#[command]
pub fn is_release_build() -> bool {
    !cfg!(debug_assertions)
}

/// 获取当前日志配置
#[command]
pub async fn get_log_config() -> Result<LogConfig, String> {
    let config = read_app_config().map_err(|e| e.to_string())?;
    Ok(config.log_config)
}

/// 更新日志配置
///
/// 仅日志级别变更可以热重载，格式和输出位置变更需要重启应用生效。
///
/// # 返回值
/// - 可热重载：`"日志配置已更新并生效"`
/// - 需要重启：`"日志配置已保存，需要重启应用后生效"`
#[command]
pub async fn update_log_config(new_config: LogConfig) -> Result<String, String> {
    tracing::info!(
        level = new_config.level.as_str(),
        format = ?new_config.format,
        output = ?new_config.output,
        "更新日志配置"
    );

    let mut config = read_app_config().map_err(|e| format!("读取配置失败: {}", e))?;
    let can_hot_reload = config.log_config.can_hot_reload(&new_config);

    config.log_config = new_config.clone();
    write_app_config(&config).map_err(|e| format!("保存配置失败: {}", e))?;

    if can_hot_reload {
        macmaster::set_log_level(new_config.level).map_err(|e| format!("热重载失败: {}", e))?;

        tracing::info!("日志配置已热重载");
        Ok("日志配置已更新并生效".to_string())
    } else {
        tracing::warn!("日志配置已保存，但需要重启应用生效");
        Ok("日志配置已保存，需要重启应用后生效".to_string())
    }
}
