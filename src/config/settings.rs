use crate::error::{BlockchainError, Result};
use log::LevelFilter;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_DATA_DIR: &str = "data";
static DEFAULT_LOG_LEVEL: &str = "info";

const DATA_DIR_KEY: &str = "DATA_DIR";
const LOG_LEVEL_KEY: &str = "LOG_LEVEL";

const DATA_DIR_ENV: &str = "NAMECHAIN_DATA_DIR";
const LOG_LEVEL_ENV: &str = "NAMECHAIN_LOG_LEVEL";

/// On-disk configuration file (`namechain.toml`). Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub data_dir: Option<String>,
    pub log_level: Option<String>,
}

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();
        map.insert(
            String::from(DATA_DIR_KEY),
            env::var(DATA_DIR_ENV).unwrap_or_else(|_| String::from(DEFAULT_DATA_DIR)),
        );
        map.insert(
            String::from(LOG_LEVEL_KEY),
            env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| String::from(DEFAULT_LOG_LEVEL)),
        );

        Config {
            inner: RwLock::new(map),
        }
    }

    /// Overlay values from a TOML file on top of the current settings.
    pub fn load_from_file(&self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&text)?;
        if let Some(level) = &file.log_level {
            LevelFilter::from_str(level)
                .map_err(|_| BlockchainError::Config(format!("Unknown log level: {level}")))?;
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(dir) = file.data_dir {
            inner.insert(String::from(DATA_DIR_KEY), dir);
        }
        if let Some(level) = file.log_level {
            inner.insert(String::from(LOG_LEVEL_KEY), level);
        }
        Ok(())
    }

    fn get(&self, key: &str, default: &str) -> String {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .get(key)
            .cloned()
            .unwrap_or_else(|| String::from(default))
    }

    pub fn get_data_dir(&self) -> String {
        self.get(DATA_DIR_KEY, DEFAULT_DATA_DIR)
    }

    pub fn set_data_dir(&self, dir: String) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(String::from(DATA_DIR_KEY), dir);
    }

    /// Falls back to `Info` for unparsable values.
    pub fn get_log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.get(LOG_LEVEL_KEY, DEFAULT_LOG_LEVEL))
            .unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let config = Config::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = \"/tmp/names\"\nlog_level = \"debug\"").unwrap();

        config.load_from_file(file.path()).unwrap();
        assert_eq!(config.get_data_dir(), "/tmp/names");
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_file_keeps_other_values() {
        let config = Config::new();
        config.set_data_dir("custom".to_string());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();

        config.load_from_file(file.path()).unwrap();
        assert_eq!(config.get_data_dir(), "custom");
        assert_eq!(config.get_log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_bad_file_rejected() {
        let config = Config::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"loud\"").unwrap();
        assert!(matches!(
            config.load_from_file(file.path()),
            Err(BlockchainError::Config(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = ").unwrap();
        assert!(config.load_from_file(file.path()).is_err());
    }
}
