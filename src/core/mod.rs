pub mod logger;

// 导出日志初始化与热重载
pub use logger::{init_logger, set_log_level, LoggerGuard};

// 重新导出 tracing 核心功能
pub use tracing::{debug, error, info, instrument, trace, warn};
