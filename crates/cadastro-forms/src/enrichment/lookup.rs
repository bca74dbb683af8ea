// File: src/enrichment/lookup.rs
// Purpose: External address lookup keyed by postal code

use super::record::EnrichmentRecord;
use crate::config::LookupConfig;
use crate::error::LookupError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Source of address records, implemented by the HTTP client and by test doubles
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Result<EnrichmentRecord, LookupError>;
}

/// Client for the ViaCEP service: one GET per postal code, no retry.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, postal_code: &str) -> String {
        format!("{}/{}/json/", self.base_url, postal_code)
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, postal_code: &str) -> Result<EnrichmentRecord, LookupError> {
        let url = self.url_for(postal_code);
        debug!(url = %url, "requesting address");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}
