//! Configuration, loaded from TOML.
//!
//! ```toml
//! [storage]
//! backend = "file"          # "file" | "memory" | "disabled"
//! path = "./ludoquiz-data"
//! table = "results"
//!
//! [images]
//! project_id = "abc123"
//! dataset = "production"
//! base_url = "https://cdn.sanity.io/images"
//!
//! [analytics]
//! enabled = true
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::impls::{FileBackend, InMemoryBackend, NoopAnalyticsSink, TracingAnalyticsSink};
use crate::ports::{AnalyticsSink, ResultBackend};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LudoquizConfig {
    pub storage: StorageConfig,
    pub images: ImageConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Memory,
    /// Storage switched off; the store runs as a no-op.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub path: PathBuf,
    pub table: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            path: PathBuf::from("./ludoquiz-data"),
            table: crate::store::DEFAULT_TABLE.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn build_backend(&self) -> Arc<dyn ResultBackend> {
        match self.backend {
            BackendKind::File => Arc::new(FileBackend::new(&self.path)),
            BackendKind::Memory => Arc::new(InMemoryBackend::new()),
            BackendKind::Disabled => Arc::new(InMemoryBackend::unavailable()),
        }
    }
}

/// Where image asset references resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub base_url: String,
    /// Empty means asset references cannot be resolved.
    pub project_id: String,
    pub dataset: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.sanity.io/images".to_string(),
            project_id: String::new(),
            dataset: "production".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AnalyticsConfig {
    pub fn build_sink(&self) -> Arc<dyn AnalyticsSink> {
        if self.enabled {
            Arc::new(TracingAnalyticsSink)
        } else {
            Arc::new(NoopAnalyticsSink)
        }
    }
}

impl LudoquizConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.table.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.table must not be empty".to_string()));
        }
        if self.storage.backend == BackendKind::File && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.path is required for the file backend".to_string(),
            ));
        }
        Ok(())
    }
}
