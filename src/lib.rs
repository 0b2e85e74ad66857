//! Mac优化大师 菜单栏组件
//!
//! 状态栏图标、概览 / 详情浮动窗口的生命周期与自动关闭，以及内存占用提醒。
//! 平台无关的逻辑都在本库中，Tauri 相关的接线在二进制 crate。

pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

pub use crate::core::{init_logger, set_log_level};
pub use error::{AppError, AppResult};
