//! Address autocomplete
//!
//! Proxies partial addresses to a GeoJSON search API (by default the French
//! Base Adresse Nationale) and returns the `label` of each feature, in the
//! order the upstream ranked them.

use std::time::Duration;

use async_trait::async_trait;
use contacts_common::config::GeocoderConfig;
use reqwest::{header, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::USER_AGENT;

/// Address suggestion failures
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoder returned status {0}")]
    Status(u16),
}

/// Partial address text -> ranked full addresses
#[async_trait]
pub trait AddressSuggester: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError>;
}

/// Suggester that never suggests anything
pub struct DisabledSuggester;

#[async_trait]
impl AddressSuggester for DisabledSuggester {
    async fn suggest(&self, _query: &str) -> Result<Vec<String>, SuggestError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    label: Option<String>,
}

/// HTTP client for a GeoJSON address search endpoint
pub struct GeocoderClient {
    http_client: Client,
    base_url: String,
    limit: u32,
}

impl GeocoderClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self, SuggestError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            limit: config.limit,
        })
    }
}

#[async_trait]
impl AddressSuggester for GeocoderClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self.limit.to_string();
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SuggestError::Status(response.status().as_u16()));
        }

        let collection: FeatureCollection = response.json().await?;
        let labels: Vec<String> = collection
            .features
            .into_iter()
            .filter_map(|f| f.properties.label)
            .collect();

        debug!(query, count = labels.len(), "Address suggestions");
        Ok(labels)
    }
}
