//! Supported marketplaces and their search-engine parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported product-search backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    Walmart,
    Ebay,
}

impl Marketplace {
    /// Returns the search-engine selector sent to the API.
    pub fn engine(&self) -> &'static str {
        match self {
            Marketplace::Walmart => "walmart",
            Marketplace::Ebay => "ebay",
        }
    }

    /// Returns the query parameter key this engine expects.
    pub fn query_param(&self) -> &'static str {
        match self {
            Marketplace::Walmart => "query",
            Marketplace::Ebay => "_nkw",
        }
    }

    /// Extra query parameters required by this engine.
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Marketplace::Walmart => &[],
            Marketplace::Ebay => &[("ebay_domain", "ebay.com")],
        }
    }

    /// Returns the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Marketplace::Walmart => "Walmart",
            Marketplace::Ebay => "eBay",
        }
    }

    /// Returns the opposite marketplace, the one matched against.
    pub fn other(&self) -> Marketplace {
        match self {
            Marketplace::Walmart => Marketplace::Ebay,
            Marketplace::Ebay => Marketplace::Walmart,
        }
    }

    /// Returns all supported marketplaces.
    pub fn all() -> &'static [Marketplace] {
        &[Marketplace::Walmart, Marketplace::Ebay]
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.engine())
    }
}

impl FromStr for Marketplace {
    type Err = MarketplaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walmart" => Ok(Marketplace::Walmart),
            "ebay" => Ok(Marketplace::Ebay),
            _ => Err(MarketplaceParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketplaceParseError(String);

impl fmt::Display for MarketplaceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown marketplace '{}'. Valid marketplaces: walmart, ebay", self.0)
    }
}

impl std::error::Error for MarketplaceParseError {}
