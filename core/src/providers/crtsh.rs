//! Certificate transparency search through crt.sh.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;
use subscope_common::Domain;
use tracing::debug;

use crate::provider::{Provider, ProviderError};

pub(super) const NAME: &str = "crtsh";
const BASE_URL: &str = "https://crt.sh";

#[derive(Debug, Deserialize)]
struct Certificate {
    name_value: String,
}

pub struct CrtSh {
    client: reqwest::Client,
    base_url: String,
}

impl CrtSh {
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
impl Provider for CrtSh {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_subdomains(&self, domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        let query = format!("%.{domain}");
        let body = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("q", query.as_str()), ("output", "json")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // crt.sh answers an empty body rather than `[]` for unknown domains
        if body.trim().is_empty() {
            return Ok(BTreeSet::new());
        }

        let certificates: Vec<Certificate> = serde_json::from_str(&body)?;
        debug!("{NAME} returned {} certificates for {domain}", certificates.len());

        let names = certificates
            .iter()
            .flat_map(|cert| cert.name_value.lines());
        Ok(super::normalize(domain, names))
    }
}
