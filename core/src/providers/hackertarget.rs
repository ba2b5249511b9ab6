//! HackerTarget host search. Answers plain text, one `host,ip` pair per line.

use std::collections::BTreeSet;

use async_trait::async_trait;
use subscope_common::Domain;

use crate::provider::{Provider, ProviderError};

pub(super) const NAME: &str = "hackertarget";
const BASE_URL: &str = "https://api.hackertarget.com";
const QUOTA_MARKER: &str = "API count exceeded";

pub struct HackerTarget {
    client: reqwest::Client,
    base_url: String,
}

impl HackerTarget {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Provider for HackerTarget {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_subdomains(&self, domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        let body = self
            .client
            .get(format!("{}/hostsearch/", self.base_url))
            .query(&[("q", domain.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let body = body.trim();
        if body.starts_with(QUOTA_MARKER) {
            return Err(ProviderError::QuotaExceeded {
                provider: NAME.to_string(),
            });
        }
        if body.starts_with("error") {
            return Err(ProviderError::UnexpectedResponse {
                provider: NAME.to_string(),
                detail: body.to_string(),
            });
        }

        let hosts = body
            .lines()
            .filter_map(|line| line.split(',').next());
        Ok(super::normalize(domain, hosts))
    }
}
