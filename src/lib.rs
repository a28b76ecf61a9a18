//! dropship-scout - Cross-marketplace product comparison CLI
//!
//! Searches Walmart and eBay through a hosted search API, matches listings
//! across the two sites by title similarity, and reports the price difference.

pub mod commands;
pub mod config;
pub mod format;
pub mod matcher;
pub mod serp;

pub use config::Config;
pub use matcher::{ComparisonResults, MatchedPair};
pub use serp::{Marketplace, ProductRecord};
