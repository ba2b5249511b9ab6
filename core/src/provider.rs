//! The contract every passive data source must satisfy.
//!
//! The enumerator only ever talks to this trait. Concrete clients live in
//! [`crate::providers`]; tests plug in their own implementations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use subscope_common::Domain;
use thiserror::Error;

/// A source of known subdomains for a domain.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable display name used to label results.
    fn name(&self) -> &str;

    /// Queries the source for subdomains of `domain`.
    async fn fetch_subdomains(&self, domain: &Domain) -> Result<BTreeSet<String>, ProviderError>;
}

/// A single provider query failed.
///
/// These never abort a run; the enumerator logs them and moves on.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} requires an API key")]
    MissingCredential { provider: String },

    #[error("{provider} quota exceeded")]
    QuotaExceeded { provider: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from {provider}: {detail}")]
    UnexpectedResponse { provider: String, detail: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
