//! Search command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::serp::{SerpClient, SerpSearch};
use anyhow::{Context, Result};
use tracing::info;

/// Executes a single-marketplace product search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = SerpClient::new(&self.config).context("Failed to create search client")?;

        self.execute_with_client(&client, query).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl SerpSearch,
        query: &str,
    ) -> Result<String> {
        if query.trim().is_empty() {
            anyhow::bail!("Search query is empty. Enter a search query and try again.");
        }

        let marketplace = self.config.sell_on;
        let mut records = client
            .organic_results(marketplace, query)
            .await
            .with_context(|| format!("{} search failed", marketplace.label()))?;

        records.truncate(self.config.limit);
        info!("Fetched {} {} products", records.len(), marketplace.label());

        Ok(Formatter::new(self.config.format).format_records(&records, marketplace))
    }
}
