use std::{net::SocketAddr, path::PathBuf};

use crate::{
    semantic::{MatchParams, DEFAULT_LIMIT, DEFAULT_MODEL, DEFAULT_THRESHOLD},
    storage::{self, StorageManager},
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_DATASET_PATH: &str = "demo.csv";
/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    IO(#[from] std::io::Error),

    #[error("config is malformed: {0}")]
    Malformed(#[from] serde_yml::Error),

    #[error("config file is not valid utf8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for query matching
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2", or "hash")
    #[serde(default = "default_model")]
    pub model: String,

    /// Minimum similarity score [0.0, 1.0]
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Maximum number of results shown per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_LIMIT,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            threshold: self.threshold,
            limit: self.max_results,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_max_results() -> usize {
    DEFAULT_LIMIT
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_dataset_path() -> String {
    DEFAULT_DATASET_PATH.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// CSV with NAME, NUMBER, EMAIL, PROFESSION columns.
    /// Relative paths resolve against the base directory.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            search: SearchConfig::default(),
            daemon: DaemonConfig::default(),
            base_path: PathBuf::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if !(0.0..=1.0).contains(&search.threshold) {
            return Err(ConfigError::Invalid(format!(
                "search.threshold must be between 0.0 and 1.0, got {}",
                search.threshold
            )));
        }

        if search.max_results == 0 {
            return Err(ConfigError::Invalid(
                "search.max_results must be greater than 0".to_string(),
            ));
        }

        if search.model.trim().is_empty() {
            return Err(ConfigError::Invalid("search.model must not be empty".to_string()));
        }

        if search.download_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "search.download_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.dataset_path.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset_path must not be empty".to_string()));
        }

        self.listen_addr()?;

        Ok(())
    }

    pub fn load_with(base_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let base_path = base_path.into();
        let store = storage::BackendLocal::new(&base_path)?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            log::info!("Creating default config at {}", base_path.join(CONFIG_FILE).display());
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str = String::from_utf8(store.read(CONFIG_FILE)?)?;
        let mut config: Self = serde_yml::from_str(&config_str)?;

        config.base_path = base_path;

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Dataset location, resolved against the base directory when relative.
    pub fn dataset_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.dataset_path);
        if path.is_absolute() {
            path
        } else {
            self.base_path.join(path)
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.daemon.listen.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "daemon.listen must be an address like {DEFAULT_LISTEN}, got {:?}",
                self.daemon.listen
            ))
        })
    }
}
