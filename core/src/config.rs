//! config.rs
//! Sensor and collector settings, loadable from TOML.
//!
//! Every field has a default, so a file only needs the values it changes.
//!
//! ```toml
//! listen_addr = "0.0.0.0:1335"
//! out_dir = "/var/lib/netcap"
//! priv_key = "/etc/netcap/priv.key"
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BATCH_ENVELOPE_HEADROOM, CHANNEL_CAPACITY, DEFAULT_BUFFER_SIZE, DEFAULT_COLLECTOR_ADDR,
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_OUT_DIR, MAX_UDP_PAYLOAD, PRIV_KEY_FILE, PUB_KEY_FILE,
};
use crate::lifecycle::validate_client_id;
use crate::sensor::BatcherConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("parse {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn load<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn check_addr(field: &str, addr: &str) -> Result<(), ConfigError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("{} {:?}: {}", field, addr, e)))
}

/// Largest `max_batch_size + client_id.len()` that still fits one datagram
/// after compression worst case, encryption and the key prefix.
pub const MAX_BATCH_SIZE_LIMIT: usize = MAX_UDP_PAYLOAD - BATCH_ENVELOPE_HEADROOM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub client_id: String,
    pub collector_addr: String,
    /// Collector public key (hex).
    pub collector_pub_key: PathBuf,
    /// Sensor private key; an ephemeral pair is generated when unset.
    pub priv_key: Option<PathBuf>,
    pub max_batch_size: usize,
    pub channel_capacity: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            collector_addr: DEFAULT_COLLECTOR_ADDR.to_string(),
            collector_pub_key: PathBuf::from(PUB_KEY_FILE),
            priv_key: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

impl SensorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_client_id(&self.client_id).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        check_addr("collector_addr", &self.collector_addr)?;
        // client_id travels in every datagram next to the batch data
        let limit = MAX_BATCH_SIZE_LIMIT - self.client_id.len();
        if self.max_batch_size == 0 || self.max_batch_size > limit {
            return Err(ConfigError::Invalid(format!(
                "max_batch_size {} must be in 1..={} for a {}-byte client_id",
                self.max_batch_size,
                limit,
                self.client_id.len()
            )));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be > 0".into()));
        }
        Ok(())
    }

    pub fn batcher(&self) -> BatcherConfig {
        BatcherConfig { client_id: self.client_id.clone(), max_batch_size: self.max_batch_size }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub listen_addr: String,
    pub out_dir: PathBuf,
    pub priv_key: PathBuf,
    pub buffer: bool,
    pub compress: bool,
    pub buffer_size: usize,
    /// Decode workers; 0 means one per CPU.
    pub workers: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_COLLECTOR_ADDR.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            priv_key: PathBuf::from(PRIV_KEY_FILE),
            buffer: true,
            compress: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            workers: 0,
        }
    }
}

impl CollectorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_addr("listen_addr", &self.listen_addr)?;
        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("out_dir must not be empty".into()));
        }
        if self.buffer && self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be > 0".into()));
        }
        Ok(())
    }
}
