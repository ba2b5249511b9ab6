//! Settings shared by the binary and the provider factory.
//!
//! Values come from an optional TOML file and are then overridden by
//! command-line flags. Nothing here talks to the network.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiKeys {
    pub virustotal: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Maximum number of provider queries in flight at once.
    pub concurrency: usize,
    /// Seconds between runs. Zero runs once.
    pub interval: i64,
    /// Provider names to query. Empty selects every usable provider.
    pub providers: Vec<String>,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    pub api_keys: ApiKeys,
    /// Suppresses banners and headers.
    ///
    /// `1` keeps results and the summary, `2` keeps results only.
    #[serde(skip)]
    pub quiet: u8,
    #[serde(skip)]
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            interval: 0,
            providers: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_keys: ApiKeys::default(),
            quiet: 0,
            output: None,
        }
    }
}

impl Config {
    /// Loads settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&raw).map_err(|source| ConfigError::ConfigSyntax {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// Checks the values the enumerator cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.interval < 0 {
            return Err(ConfigError::NegativeInterval(self.interval));
        }
        if let Some(path) = &self.output {
            validate_output_path(path)?;
        }
        Ok(())
    }
}

/// An output path must not name a directory, and its parent must exist.
pub fn validate_output_path(path: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::OutputPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if path.is_dir() {
        return Err(invalid("is a directory"));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(invalid("parent directory does not exist"))
        }
        _ => Ok(()),
    }
}
