//! Decoding of search responses into normalized product records.

use super::marketplaces::Marketplace;
use super::models::{EbayResult, ProductRecord, SearchResponse, WalmartResult};
use tracing::{debug, warn};

/// Decodes a search response body for the given marketplace.
///
/// A missing `organic_results` list is treated as zero results, and a
/// service-level `error` field is logged and likewise yields zero results;
/// only an undecodable body is an error.
pub fn parse_organic_results(
    marketplace: Marketplace,
    body: &str,
) -> Result<Vec<ProductRecord>, serde_json::Error> {
    let records: Vec<ProductRecord> = match marketplace {
        Marketplace::Walmart => {
            let response: SearchResponse<WalmartResult> = serde_json::from_str(body)?;
            log_service_error(marketplace, response.error.as_deref());
            response.organic_results.into_iter().filter_map(WalmartResult::into_record).collect()
        }
        Marketplace::Ebay => {
            let response: SearchResponse<EbayResult> = serde_json::from_str(body)?;
            log_service_error(marketplace, response.error.as_deref());
            response.organic_results.into_iter().filter_map(EbayResult::into_record).collect()
        }
    };

    debug!("Parsed {} {} records", records.len(), marketplace.label());
    Ok(records)
}

fn log_service_error(marketplace: Marketplace, error: Option<&str>) {
    if let Some(message) = error {
        warn!("{} search returned a service error: {}", marketplace.label(), message);
    }
}
