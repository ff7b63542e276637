//! Client configuration, read from a RON file.
//!
//! A missing file yields defaults. `OBSERVER_SERVER_URL` and
//! `OBSERVER_WORKER_URL` override the corresponding fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use observer_engine::{ClientSettings, PollSettings};
use observer_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "observer.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("poll_interval_ms must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub server_url: String,
    pub worker_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub log_file: Option<PathBuf>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            server_url: client.server_url,
            worker_url: client.worker_url,
            poll_interval_ms: 2000,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.as_millis() as u64,
            log_destination: LogDestination::File,
            log_file: None,
        }
    }
}

impl ObserverConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("OBSERVER_SERVER_URL") {
            self.server_url = url;
        }
        if let Some(url) = lookup("OBSERVER_WORKER_URL") {
            self.worker_url = url;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            server_url: self.server_url.clone(),
            worker_url: self.worker_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..ClientSettings::default()
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        let interval = Duration::from_millis(self.poll_interval_ms);
        PollSettings {
            registry_interval: interval,
            results_interval: interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut expected = ObserverConfig::default();
        expected.apply_overrides(|key| std::env::var(key).ok());

        let config = ObserverConfig::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, expected);
        assert_eq!(config.poll_settings().registry_interval, Duration::from_millis(2000));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"(worker_url: "http://worker:9000", poll_interval_ms: 500, log_destination: Both)"#,
        )
        .unwrap();

        let config = ObserverConfig::load(&path).unwrap();
        let worker_url = std::env::var("OBSERVER_WORKER_URL")
            .unwrap_or_else(|_| "http://worker:9000".to_string());
        let server_url = std::env::var("OBSERVER_SERVER_URL")
            .unwrap_or_else(|_| ObserverConfig::default().server_url);
        assert_eq!(config.worker_url, worker_url);
        assert_eq!(config.server_url, server_url);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(
            config.client_settings().request_timeout,
            ClientSettings::default().request_timeout
        );
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "(poll_interval_ms: \"soon\")").unwrap();

        assert!(matches!(
            ObserverConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "(poll_interval_ms: 0)").unwrap();

        assert!(matches!(
            ObserverConfig::load(&path),
            Err(ConfigError::ZeroInterval)
        ));
    }

    #[test]
    fn environment_overrides_urls() {
        let mut config = ObserverConfig::default();
        config.apply_overrides(|key| match key {
            "OBSERVER_SERVER_URL" => Some("http://server:1".to_string()),
            _ => None,
        });
        assert_eq!(config.server_url, "http://server:1");
        assert_eq!(config.worker_url, ObserverConfig::default().worker_url);
    }
}
