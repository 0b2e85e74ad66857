pub mod config;
pub mod metrics;

pub use config::{AlertConfig, AppConfig, LogConfig, LogFormat, LogLevel, LogOutput};
pub use metrics::{AlertAction, OffendingProcess, SystemSnapshot};

use serde::{Deserialize, Serialize};

/// 概览窗口中可点击的小组件对应的详情页
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Overview,
    Storage,
    Memory,
    Battery,
    Cpu,
    Network,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Overview,
        Route::Storage,
        Route::Memory,
        Route::Battery,
        Route::Cpu,
        Route::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Overview => "overview",
            Route::Storage => "storage",
            Route::Memory => "memory",
            Route::Battery => "battery",
            Route::Cpu => "cpu",
            Route::Network => "network",
        }
    }

    /// 前端 hash 路由，例如 `/memory`
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().trim_start_matches('/');
        Route::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("memory"), Some(Route::Memory));
        assert_eq!(Route::parse("/network"), Some(Route::Network));
        assert_eq!(Route::parse("settings"), None);
    }

    #[test]
    fn test_route_serde_lowercase() {
        let json = serde_json::to_string(&Route::Cpu).unwrap();
        assert_eq!(json, "\"cpu\"");
        let route: Route = serde_json::from_str("\"battery\"").unwrap();
        assert_eq!(route, Route::Battery);
        assert_eq!(route.path(), "/battery");
    }
}
