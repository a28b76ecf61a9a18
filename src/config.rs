//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::serp::Marketplace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search service API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Marketplace to sell on; the other one is searched for matches
    #[serde(default)]
    pub sell_on: Marketplace,

    /// How many sell-side results to expand (1-20)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Minimum title similarity as a percentage (1-100)
    #[serde(default = "default_similarity")]
    pub similarity: u8,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// File format to save results in, if any
    #[serde(default)]
    pub save: Option<SaveFormat>,

    /// Save path override
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_limit() -> usize {
    10
}

fn default_similarity() -> u8 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            sell_on: Marketplace::Walmart,
            limit: default_limit(),
            similarity: default_similarity(),
            format: OutputFormat::Table,
            save: None,
            output: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("dropship-scout").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("SERPAPI_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }

        self
    }

    /// Checks the limit and similarity bounds.
    pub fn validate(&self) -> Result<()> {
        if !(1..=20).contains(&self.limit) {
            anyhow::bail!("limit must be between 1 and 20, got {}", self.limit);
        }
        if !(1..=100).contains(&self.similarity) {
            anyhow::bail!("similarity must be between 1 and 100, got {}", self.similarity);
        }
        Ok(())
    }

    /// Similarity threshold as a ratio in [0, 1].
    pub fn threshold(&self) -> f64 {
        f64::from(self.similarity) / 100.0
    }
}

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Html,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, html, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// File format for saved comparison results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    Json,
    Csv,
}

impl SaveFormat {
    /// Default file name for this format.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SaveFormat::Json => "comparison-results.json",
            SaveFormat::Csv => "comparison-results.csv",
        }
    }
}

impl std::str::FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SaveFormat::Json),
            "csv" => Ok(SaveFormat::Csv),
            _ => Err(format!("Unknown save format: {}. Use: json, csv", s)),
        }
    }
}

impl std::fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveFormat::Json => write!(f, "json"),
            SaveFormat::Csv => write!(f, "csv"),
        }
    }
}
