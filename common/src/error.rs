use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected before any provider is queried.
///
/// All of these are fatal: the run never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target domains were given")]
    NoTargets,

    #[error("no providers are available for enumeration")]
    NoProviders,

    #[error("concurrency must be a positive integer")]
    ZeroConcurrency,

    #[error("schedule interval cannot be negative (got {0})")]
    NegativeInterval(i64),

    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("failed to read targets from {path}: {source}")]
    TargetsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid output path {path}: {reason}")]
    OutputPath { path: PathBuf, reason: String },

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("provider '{provider}' requires an API key")]
    MissingCredential { provider: String },

    #[error("failed to read configuration file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration file {path}: {source}")]
    ConfigSyntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
