//! Runtime configuration, read from an optional RON file.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bakery_engine::{ClientSettings, DEFAULT_BASE_URL};
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "bakery.ron";
const CONFIG_PATH_VAR: &str = "BAKERY_CONFIG";
const BASE_URL_VAR: &str = "BAKERY_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub log_destination: LogDestination,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_destination: LogDestination::default(),
            user_agent: client.user_agent,
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url,
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Loads `bakery.ron` (or `$BAKERY_CONFIG`) and applies `$BAKERY_BASE_URL`.
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    load_from(&path)?
        .with_base_url_override(env::var(BASE_URL_VAR).ok())
        .validate()
}

/// A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bakery.ron");
        fs::write(
            &path,
            r#"(base_url: "http://localhost:3000", log_destination: Both)"#,
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.user_agent, AppConfig::default().user_agent);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bakery.ron");
        fs::write(&path, "(base_url: ").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn env_override_replaces_base_url() {
        let config = AppConfig::default()
            .with_base_url_override(Some(" http://127.0.0.1:8080 ".to_string()));
        assert_eq!(config.base_url, "http://127.0.0.1:8080");

        let blank = AppConfig::default().with_base_url_override(Some("  ".to_string()));
        assert_eq!(blank.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = AppConfig {
            base_url: "ftp://bakery.example".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
