//! Master node configuration.
//!
//! Loaded from a JSON file, every field optional. The worker list is the
//! only thing a deployment normally has to set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use node_client::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Worker addresses (`host:port`), in assignment order
    pub workers: Vec<String>,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub max_connect_attempts: u32,
    pub retry_delay_ms: u64,
    /// Recommendations returned per request
    pub top_n: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            workers: vec![
                "slave1:8082".to_string(),
                "slave2:8083".to_string(),
                "slave3:8084".to_string(),
            ],
            connect_timeout_ms: 5_000,
            read_timeout_ms: 5_000,
            max_connect_attempts: 3,
            retry_delay_ms: 500,
            top_n: pipeline::DEFAULT_TOP_N,
        }
    }
}

impl ClusterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClusterConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Loaded cluster config from {} ({} workers)", path.display(), config.workers.len());
        Ok(config)
    }

    /// Replace the worker list, e.g. from a command-line flag
    pub fn with_workers(mut self, workers: Vec<String>) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers.is_empty() {
            return Err(ConfigError::Invalid("at least one worker is required".into()));
        }
        if let Some(blank) = self.workers.iter().find(|w| w.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank worker address {:?}", blank)));
        }
        if self.max_connect_attempts == 0 {
            return Err(ConfigError::Invalid("max_connect_attempts must be at least 1".into()));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            max_attempts: self.max_connect_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
