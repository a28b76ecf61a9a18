//! Cross-marketplace product matching.
//!
//! Expands the top results of the sell-side marketplace, re-queries the other
//! marketplace with each title, and keeps every candidate whose title
//! similarity clears the threshold.

pub mod profit;
pub mod similarity;

use crate::serp::{Marketplace, ProductRecord, SerpSearch};
use tracing::{debug, info, warn};

/// A source listing paired with a similar candidate from the other marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    /// Listing on the marketplace selected for selling
    pub source: ProductRecord,
    /// Similar listing found on the other marketplace
    pub candidate: ProductRecord,
    /// `source.price - candidate.price`, rounded to cents; 0 when either is missing
    pub profit: f64,
}

/// One comparison run's result set.
#[derive(Debug, Clone)]
pub struct ComparisonResults {
    /// Search query used
    pub query: String,
    /// Marketplace selected for selling
    pub sell_on: Marketplace,
    /// Matched pairs, in source order then candidate order
    pub pairs: Vec<MatchedPair>,
}

impl ComparisonResults {
    /// Creates an empty result set.
    pub fn new(query: impl Into<String>, sell_on: Marketplace) -> Self {
        Self { query: query.into(), sell_on, pairs: Vec::new() }
    }

    /// Returns the number of matched pairs.
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Matches products across the two marketplaces.
///
/// Fetches up to `limit` sell-side results for `query`, then queries the other
/// marketplace once per source title. Candidates whose similarity to the
/// source title falls below `threshold` (a ratio in [0, 1]) are dropped. Calls
/// run sequentially; a failed fetch degrades to zero results for that call.
pub async fn match_products(
    client: &impl SerpSearch,
    sell_on: Marketplace,
    query: &str,
    limit: usize,
    threshold: f64,
) -> ComparisonResults {
    let mut results = ComparisonResults::new(query, sell_on);
    if limit == 0 {
        return results;
    }

    let buy_from = sell_on.other();
    let source_records = fetch_or_empty(client, sell_on, query).await;

    for source in source_records.into_iter().take(limit) {
        let candidates = fetch_or_empty(client, buy_from, &source.title).await;
        debug!("{} candidates on {} for {:?}", candidates.len(), buy_from.label(), source.title);

        for candidate in candidates {
            if similarity::title_ratio(&source.title, &candidate.title) < threshold {
                continue;
            }

            let profit = profit::compute_profit(source.price, candidate.price);
            results.pairs.push(MatchedPair { source: source.clone(), candidate, profit });
        }
    }

    info!(
        "Matched {} pairs selling on {} against {}",
        results.count(),
        sell_on.label(),
        buy_from.label()
    );

    results
}

async fn fetch_or_empty(
    client: &impl SerpSearch,
    marketplace: Marketplace,
    query: &str,
) -> Vec<ProductRecord> {
    match client.organic_results(marketplace, query).await {
        Ok(records) => records,
        Err(err) => {
            warn!("{} search for {:?} failed: {}", marketplace.label(), query, err);
            Vec::new()
        }
    }
}
