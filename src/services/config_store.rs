use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const APP_DIR: &str = ".macmaster";
const CONFIG_FILE: &str = "config.json";

/// 应用数据目录 `~/.macmaster`
pub fn app_data_dir() -> AppResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(APP_DIR))
        .ok_or_else(|| AppError::config("无法获取用户主目录"))
}

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取文件；不存在或为空时返回默认值
    pub fn read_or_default<T>(&self) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        if !self.path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write<T: Serialize>(&self, value: &T) -> AppResult<()> {
        self.ensure_parent()?;
        let tmp_path = self.tmp_path();
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&tmp_path, content)?;
        self.replace_with_tmp(tmp_path)
    }

    fn ensure_parent(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn replace_with_tmp(&self, tmp_path: PathBuf) -> AppResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}

/// 全局配置文件 `~/.macmaster/config.json`
pub fn config_store() -> AppResult<JsonStore> {
    Ok(JsonStore::new(app_data_dir()?.join(CONFIG_FILE)))
}

pub fn read_app_config() -> AppResult<AppConfig> {
    let config: AppConfig = config_store()?.read_or_default()?;
    config.alert.validate()?;
    Ok(config)
}

pub fn write_app_config(config: &AppConfig) -> AppResult<()> {
    config.alert.validate()?;
    config_store()?.write(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogLevel, LogOutput};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("config.json"));
        let config: AppConfig = store.read_or_default().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "  \n").unwrap();
        let config: AppConfig = JsonStore::new(&path).read_or_default().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("config.json"));

        let mut config = AppConfig::default();
        config.log_config.level = LogLevel::Debug;
        config.log_config.output = LogOutput::Console;
        config.alert.threshold = 0.9;
        store.write(&config).unwrap();

        let loaded: AppConfig = store.read_or_default().unwrap();
        assert_eq!(loaded, config);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let result: AppResult<AppConfig> = JsonStore::new(&path).read_or_default();
        assert!(matches!(result, Err(AppError::Json(_))));
    }
}
