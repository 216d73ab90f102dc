//! Loader configuration.
//!
//! The configuration file is YAML with a `storage` section (where to write)
//! and a `generator` section (how much to write):
//!
//! ```yaml
//! storage:
//!   addr: 127.0.0.1
//!   port: 8123
//!   user: default
//!   passwd: ""
//!   max_pings: 3
//!   default_db: biometrics
//!   write_timeout_ms: 10000
//!   read_timeout_ms: 10000
//!   debug: false
//! generator:
//!   n: 100000
//!   in_iter: 1000
//! ```

pub mod timeout;

use clickhouse_sink::ConnectionTarget;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use timeout::truncate_ms_to_secs;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("unable to read configuration file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing YAML
    #[error("unable to parse configuration file")]
    Parse(#[from] serde_yaml::Error),

    /// Parsed, but unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
}

/// Connection settings for the ClickHouse store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    pub addr: String,
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub passwd: String,
    /// Liveness probes to attempt before giving up.
    pub max_pings: u32,
    pub default_db: String,
    pub write_timeout_ms: u64,
    pub read_timeout_ms: u64,
    #[serde(default)]
    pub debug: bool,
}

impl StorageConfig {
    /// Build the connection target, truncating timeouts to whole seconds.
    pub fn connection_target(&self) -> ConnectionTarget {
        ConnectionTarget {
            host: self.addr.clone(),
            port: self.port,
            username: self.user.clone(),
            password: self.passwd.clone(),
            database: self.default_db.clone(),
            read_timeout: truncate_ms_to_secs(self.read_timeout_ms),
            write_timeout: truncate_ms_to_secs(self.write_timeout_ms),
            debug: self.debug,
        }
    }
}

/// Settings for record generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Total number of control object / feature vector pairs to write.
    pub n: u64,
    /// Records per batch.
    pub in_iter: usize,
    /// RNG seed; defaults to the wall clock at startup.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reject settings the loader cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.in_iter == 0 {
            return Err(ConfigError::Invalid(
                "generator.in_iter must be greater than zero".to_string(),
            ));
        }
        if self.storage.max_pings == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_pings must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
