//! HTTP client for the hosted product-search API.

use super::marketplaces::Marketplace;
use super::models::ProductRecord;
use super::parser;
use crate::config::Config;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use wreq::Client;

const SERPAPI_BASE: &str = "https://serpapi.com";

/// Errors at the search-service boundary.
#[derive(Debug, Error)]
pub enum SerpError {
    #[error("No API key configured. Set SERPAPI_API_KEY or api_key in config.toml")]
    MissingApiKey,

    #[error("Search request failed: {0}")]
    Request(#[from] wreq::Error),

    #[error("Search service returned HTTP status {0}")]
    Status(u16),

    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for marketplace search - enables mocking for tests.
#[async_trait]
pub trait SerpSearch: Send + Sync {
    /// Runs one search scoped to a marketplace and returns its organic results.
    async fn organic_results(
        &self,
        marketplace: Marketplace,
        query: &str,
    ) -> Result<Vec<ProductRecord>, SerpError>;
}

/// Search API HTTP client.
pub struct SerpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpClient {
    /// Creates a new client. Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, SerpError> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self, SerpError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SerpError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, api_key, base_url: base_url.unwrap_or_else(|| SERPAPI_BASE.to_string()) })
    }

    fn search_url(&self, marketplace: Marketplace, query: &str) -> String {
        let mut url = format!(
            "{}/search.json?engine={}&{}={}",
            self.base_url,
            marketplace.engine(),
            marketplace.query_param(),
            urlencoding::encode(query)
        );

        for (key, value) in marketplace.extra_params() {
            url.push_str(&format!("&{}={}", key, value));
        }

        url
    }

    async fn fetch(&self, url: &str) -> Result<String, SerpError> {
        // The key is appended after the URL is logged
        debug!("GET {}", url);
        let url = format!("{}&api_key={}", url, self.api_key);

        let response = self.client.get(&url).header("Accept", "application/json").send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SerpError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SerpSearch for SerpClient {
    async fn organic_results(
        &self,
        marketplace: Marketplace,
        query: &str,
    ) -> Result<Vec<ProductRecord>, SerpError> {
        info!("Searching {}: {}", marketplace.label(), query);

        let url = self.search_url(marketplace, query);
        let body = self.fetch(&url).await?;

        Ok(parser::parse_organic_results(marketplace, &body)?)
    }
}
