//! Configuration management
//!
//! Defaults, then `config.json` in the user config dir, then environment,
//! then command-line flags (applied by `main`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app::catalog::DEFAULT_API_BASE_URL;
use crate::app::poster::PLACEHOLDER_POSTER_URL;

pub const APP_DIR: &str = "phim_tui";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_placeholder_image_url")]
    pub placeholder_image_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `phim_tui=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; defaults to the user cache dir.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }
fn default_placeholder_image_url() -> String { PLACEHOLDER_POSTER_URL.to_string() }
fn default_user_agent() -> String { format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")) }
fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            placeholder_image_url: default_placeholder_image_url(),
            user_agent: default_user_agent(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push("config.json");
        path
    }

    /// Reads `path`. A file that does not exist gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// `PHIM_API_BASE_URL` and `PHIM_LOG`; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = var("PHIM_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(level) = var("PHIM_LOG") {
            self.logging.level = level;
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.logging.file.clone().unwrap_or_else(|| {
            let mut path = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
            path.push(APP_DIR);
            path.push("phim_tui.log");
            path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("phim_tui_test_{}_{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("phim_tui_definitely_missing/config.json");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "https://ophim1.com/v1/api");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_file("partial", r#"{ "logging": { "level": "debug" } }"#);
        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.placeholder_image_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let path = temp_file("invalid", "{ not json");
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([("PHIM_API_BASE_URL", "http://localhost:9000/api"), ("PHIM_LOG", "  ")]);
        let mut config = AppConfig::default();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn explicit_log_file_wins() {
        let mut config = AppConfig::default();
        config.logging.file = Some(PathBuf::from("/tmp/x.log"));
        assert_eq!(config.log_file(), PathBuf::from("/tmp/x.log"));
    }
}
