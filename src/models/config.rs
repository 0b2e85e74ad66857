// Application Configuration Models
//
// 应用配置数据模型（~/.macmaster/config.json）

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Console,
    File,
    #[default]
    Both,
}

/// 日志系统配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
}

impl LogConfig {
    /// 仅日志级别变化时可以热重载，格式和输出目标需要重启
    pub fn can_hot_reload(&self, other: &LogConfig) -> bool {
        self.format == other.format && self.output == other.output
    }
}

/// 内存提醒配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 触发提醒的内存占用比例 (0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// 采样间隔（秒）
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,
}

fn default_threshold() -> f64 {
    0.85
}

fn default_sample_interval() -> u64 {
    5
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            sample_interval_secs: default_sample_interval(),
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AppError::validation(
                "alert.threshold",
                format!("必须在 (0, 1] 范围内，当前值 {}", self.threshold),
            ));
        }
        if self.sample_interval_secs == 0 {
            return Err(AppError::validation(
                "alert.sample_interval_secs",
                "采样间隔至少为 1 秒",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub log_config: LogConfig,
    #[serde(default)]
    pub alert: AlertConfig,
}
