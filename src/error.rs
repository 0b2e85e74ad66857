use std::fmt::Display;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tauri 错误: {0}")]
    Tauri(#[from] tauri::Error),
    #[error("窗口操作失败: {0}")]
    Window(String),
    #[error("进程操作失败: {0}")]
    Process(String),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("参数校验失败 [{field}]: {reason}")]
    Validation { field: String, reason: String },
    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn window<E: Display>(err: E) -> Self {
        Self::Window(err.to_string())
    }

    pub fn process<E: Display>(err: E) -> Self {
        Self::Process(err.to_string())
    }

    pub fn config<E: Display>(err: E) -> Self {
        Self::Config(err.to_string())
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// 命令返回给前端时只需要可读的错误描述
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
