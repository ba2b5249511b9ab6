//! Concrete [`Provider`] clients and the factory that assembles them from
//! user configuration.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use subscope_common::{ConfigError, Domain, config::Config};
use tracing::{debug, warn};

use crate::provider::Provider;

mod crtsh;
mod hackertarget;
mod virustotal;

pub use crtsh::CrtSh;
pub use hackertarget::HackerTarget;
pub use virustotal::VirusTotal;

/// Every provider name the factory understands, in iteration order.
pub const NAMES: &[&str] = &[crtsh::NAME, hackertarget::NAME, virustotal::NAME];

const USER_AGENT: &str = concat!("subscope/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client used by all providers of a run.
pub fn http_client(cfg: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("building HTTP client")
}

/// Instantiates the provider called `name`.
pub fn build(
    name: &str,
    cfg: &Config,
    client: &reqwest::Client,
) -> Result<Arc<dyn Provider>, ConfigError> {
    let provider: Arc<dyn Provider> = match name.trim().to_ascii_lowercase().as_str() {
        crtsh::NAME => Arc::new(CrtSh::new(client.clone())),
        hackertarget::NAME => Arc::new(HackerTarget::new(client.clone())),
        virustotal::NAME => {
            let key = cfg.api_keys.virustotal.clone().ok_or_else(|| {
                ConfigError::MissingCredential {
                    provider: virustotal::NAME.to_string(),
                }
            })?;
            Arc::new(VirusTotal::new(client.clone(), key))
        }
        other => return Err(ConfigError::UnknownProvider(other.to_string())),
    };
    Ok(provider)
}

/// Resolves the provider set for a run.
///
/// An explicit selection fails on the first unknown or unusable name. With no
/// selection every provider is tried and those lacking credentials are skipped.
pub fn select(cfg: &Config) -> anyhow::Result<Vec<Arc<dyn Provider>>> {
    let client = http_client(cfg)?;

    if !cfg.providers.is_empty() {
        let mut seen = BTreeSet::new();
        let mut providers = Vec::new();
        for name in &cfg.providers {
            if !seen.insert(name.trim().to_ascii_lowercase()) {
                continue;
            }
            providers.push(build(name, cfg, &client)?);
        }
        return Ok(providers);
    }

    let mut providers = Vec::new();
    for name in NAMES {
        match build(name, cfg, &client) {
            Ok(provider) => providers.push(provider),
            Err(ConfigError::MissingCredential { provider }) => {
                warn!("Skipping {provider}: no API key configured");
            }
            Err(e) => return Err(e.into()),
        }
    }
    debug!("Selected {} providers", providers.len());
    Ok(providers)
}

/// Cleans raw names returned by a source.
///
/// Names are trimmed and lower-cased, wildcard prefixes and trailing dots are
/// removed, and only strict subdomains of `domain` are kept.
pub(crate) fn normalize<'a, I>(domain: &Domain, names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| {
            name.trim()
                .trim_start_matches("*.")
                .trim_end_matches('.')
                .to_ascii_lowercase()
        })
        .filter(|name| domain.is_parent_of(name))
        .collect()
}
