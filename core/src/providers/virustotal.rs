//! VirusTotal v3 domain relationships. Requires an API key.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use subscope_common::Domain;

use crate::provider::{Provider, ProviderError};

pub(super) const NAME: &str = "virustotal";
const BASE_URL: &str = "https://www.virustotal.com";
const PAGE_LIMIT: &str = "40";

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<Object>,
}

#[derive(Debug, Deserialize)]
struct Object {
    id: String,
}

pub struct VirusTotal {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VirusTotal {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, BASE_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Provider for VirusTotal {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_subdomains(&self, domain: &Domain) -> Result<BTreeSet<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/api/v3/domains/{domain}/subdomains", self.base_url))
            .query(&[("limit", PAGE_LIMIT)])
            .header("x-apikey", &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::MissingCredential {
                    provider: NAME.to_string(),
                });
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::QuotaExceeded {
                    provider: NAME.to_string(),
                });
            }
            _ => {}
        }

        let body = response.error_for_status()?.text().await?;
        let page: Page = serde_json::from_str(&body)?;
        Ok(super::normalize(domain, page.data.iter().map(|obj| obj.id.as_str())))
    }
}
