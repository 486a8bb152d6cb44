//! `clipper.ron` loading. A missing file means defaults; a broken one is
//! reported and also falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clipper_engine::{ClientSettings, EngineConfig, PollSettings};
use engine_logging::LogDestination;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 1500,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            log_level: "info".to_string(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("clipper.log"),
        }
    }
}

impl ClipperConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            client: ClientSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// `Ok(None)` when the file does not exist.
pub fn read_config(path: &Path) -> Result<Option<ClipperConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads the configuration, returning defaults plus the error when the file
/// is unusable. Logging is not up yet at this point, so the caller reports it.
pub fn load_config(path: &Path) -> (ClipperConfig, Option<ConfigError>) {
    match read_config(path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (ClipperConfig::default(), Some(err)),
    }
}
