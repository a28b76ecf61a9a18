//! Compare command implementation.

use crate::config::{Config, SaveFormat};
use crate::format::{export, Formatter};
use crate::matcher::{self, ComparisonResults};
use crate::serp::{SerpClient, SerpSearch};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Executes a cross-marketplace comparison.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the comparison and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = SerpClient::new(&self.config).context("Failed to create search client")?;

        self.execute_with_client(&client, query).await
    }

    /// Executes the comparison with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl SerpSearch,
        query: &str,
    ) -> Result<String> {
        if query.trim().is_empty() {
            anyhow::bail!("Search query is empty. Enter a search query and try again.");
        }

        info!(
            "Comparing products for {:?}, selling on {}",
            query,
            self.config.sell_on.label()
        );

        let results = matcher::match_products(
            client,
            self.config.sell_on,
            query,
            self.config.limit,
            self.config.threshold(),
        )
        .await;

        if let Some(format) = self.config.save {
            if results.is_empty() {
                info!("Nothing matched, skipping {} save", format);
            } else {
                let path = self.save_path(format);
                self.save(&results, format, &path)?;
                info!("Saved {} pairs to {}", results.count(), path.display());
            }
        }

        Ok(Formatter::new(self.config.format).format_comparison(&results))
    }

    fn save_path(&self, format: SaveFormat) -> PathBuf {
        self.config.output.clone().unwrap_or_else(|| PathBuf::from(format.default_file_name()))
    }

    fn save(&self, results: &ComparisonResults, format: SaveFormat, path: &Path) -> Result<()> {
        let records = export::from_results(results);
        let contents = match format {
            SaveFormat::Json => export::to_json(&records),
            SaveFormat::Csv => export::to_csv(&records),
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
