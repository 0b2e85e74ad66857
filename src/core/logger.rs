//! 日志系统
//!
//! 基于 tracing-subscriber：控制台 / 文件（按天滚动）输出，文本或 JSON 格式，
//! 日志级别可在运行时热重载。

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

use crate::error::{AppError, AppResult};
use crate::models::{LogConfig, LogFormat, LogLevel, LogOutput};

const LOG_FILE_PREFIX: &str = "macmaster.log";

type FilterHandle = reload::Handle<EnvFilter, Registry>;
type BaseSubscriber = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<BaseSubscriber> + Send + Sync>;

static FILTER_HANDLE: OnceLock<FilterHandle> = OnceLock::new();

/// 持有文件写入线程；被丢弃时刷新缓冲
pub struct LoggerGuard {
    _file_guard: Option<WorkerGuard>,
}

/// 本应用模块使用配置的级别，第三方依赖（tauri / wry 等）只保留 warn 以上
pub fn filter_directive(level: LogLevel) -> String {
    format!(
        "warn,macmaster={0},macmaster_menubar={0}",
        level.as_str()
    )
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
    }
}

fn file_layer(format: LogFormat, log_dir: &Path) -> AppResult<(BoxedLayer, WorkerGuard)> {
    fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = match format {
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .boxed(),
    };
    Ok((layer, guard))
}

/// 初始化全局日志，只能调用一次
pub fn init_logger(config: &LogConfig, log_dir: &Path) -> AppResult<LoggerGuard> {
    let (filter, handle) = reload::Layer::new(build_filter(config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        layers.push(console_layer(config.format));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        let (layer, guard) = file_layer(config.format, log_dir)?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    Registry::default()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| AppError::Other(format!("日志系统初始化失败: {}", e)))?;

    let _ = FILTER_HANDLE.set(handle);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        "日志系统已初始化"
    );

    Ok(LoggerGuard {
        _file_guard: file_guard,
    })
}

/// 热重载日志级别
pub fn set_log_level(level: LogLevel) -> AppResult<()> {
    let handle = FILTER_HANDLE
        .get()
        .ok_or_else(|| AppError::Other("日志系统未初始化".to_string()))?;
    handle
        .reload(EnvFilter::new(filter_directive(level)))
        .map_err(|e| AppError::Other(format!("日志级别重载失败: {}", e)))?;
    tracing::info!(level = level.as_str(), "日志级别已更新");
    Ok(())
}
