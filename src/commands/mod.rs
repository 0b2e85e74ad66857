pub mod alert_commands;
pub mod log_commands;
pub mod metrics_commands;
pub mod window_commands;

pub use alert_commands::{alert_current, alert_dismiss, alert_ignore, alert_snooze, alert_terminate};
pub use log_commands::{get_log_config, is_release_build, update_log_config};
pub use metrics_commands::get_snapshot;
pub use window_commands::{close_detail, close_panels, open_main_app, show_detail, toggle_overview};
