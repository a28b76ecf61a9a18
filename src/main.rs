//! dropship-scout - Cross-marketplace product comparison CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use dropship_scout::commands::{CompareCommand, SearchCommand};
use dropship_scout::config::{Config, OutputFormat, SaveFormat};
use dropship_scout::serp::Marketplace;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dropship-scout",
    version,
    about = "Cross-marketplace product comparison CLI",
    long_about = "Searches Walmart and eBay through a hosted search API, matches listings \
                  across the two sites by title similarity, and reports the price difference."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Search service API key
    #[arg(long, global = true, env = "SERPAPI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare products across the two marketplaces
    #[command(alias = "c")]
    Compare {
        /// Search query
        query: String,

        /// Marketplace to sell on; the other one is searched for matches
        #[arg(long, default_value = "walmart")]
        sell_on: Marketplace,

        /// Number of sell-side products to analyze
        #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u8).range(1..=20))]
        limit: u8,

        /// Minimum title similarity percentage between matched listings
        #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u8).range(1..=100))]
        similarity: u8,

        /// File format to save the results in
        #[arg(long)]
        save: Option<SaveFormat>,

        /// Save path override
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search a single marketplace
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Marketplace to search
        #[arg(short, long, default_value = "walmart")]
        marketplace: Marketplace,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// List supported marketplaces
    Marketplaces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }

    match cli.command {
        Commands::Compare { query, sell_on, limit, similarity, save, output } => {
            config.sell_on = sell_on;
            config.limit = usize::from(limit);
            config.similarity = similarity;

            if let Some(save) = save {
                config.save = Some(save);
            }
            if let Some(output) = output {
                config.output = Some(output);
            }

            config.validate()?;

            let cmd = CompareCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Search { query, marketplace, max } => {
            config.sell_on = marketplace;
            config.limit = max;

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Marketplaces => {
            println!("Supported marketplaces:\n");
            println!("{:<10} {:<10} {:<12} {}", "Name", "Engine", "Query key", "Extra params");
            println!("{:-<10} {:-<10} {:-<12} {:-<12}", "", "", "", "");

            for marketplace in Marketplace::all() {
                let extra = marketplace
                    .extra_params()
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join(" ");

                println!(
                    "{:<10} {:<10} {:<12} {}",
                    marketplace.label(),
                    marketplace.engine(),
                    marketplace.query_param(),
                    extra
                );
            }
        }
    }

    Ok(())
}
