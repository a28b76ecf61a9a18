//! Data models for search responses and normalized product records.

use serde::{Deserialize, Serialize};

/// A normalized product listing from either marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Listing title
    pub title: String,
    /// Listing price, when the response carried one
    pub price: Option<f64>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Product page URL
    pub link: Option<String>,
}

impl ProductRecord {
    /// Creates a record with just a title and price.
    pub fn new(title: impl Into<String>, price: Option<f64>) -> Self {
        Self { title: title.into(), price, thumbnail: None, link: None }
    }
}

/// Top-level search response envelope.
///
/// Anything beyond `organic_results` and the service-level `error` field is
/// ignored; the service gives no schema guarantee for the rest.
#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub organic_results: Vec<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw Walmart organic result. Price lives at `primary_offer.offer_price`.
#[derive(Debug, Deserialize)]
pub struct WalmartResult {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub product_page_url: Option<String>,
    pub primary_offer: Option<WalmartOffer>,
}

#[derive(Debug, Deserialize)]
pub struct WalmartOffer {
    pub offer_price: Option<f64>,
}

impl WalmartResult {
    /// Normalizes into a [`ProductRecord`]; results without a title are dropped.
    pub fn into_record(self) -> Option<ProductRecord> {
        Some(ProductRecord {
            title: self.title?,
            price: self.primary_offer.and_then(|o| o.offer_price),
            thumbnail: self.thumbnail,
            link: self.product_page_url,
        })
    }
}

/// Raw eBay organic result. Price is `price.extracted`, falling back to the
/// range-style `price.from.extracted` for "from $X" listings.
#[derive(Debug, Deserialize)]
pub struct EbayResult {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub link: Option<String>,
    pub price: Option<EbayPrice>,
}

#[derive(Debug, Deserialize)]
pub struct EbayPrice {
    pub extracted: Option<f64>,
    #[serde(rename = "from")]
    pub from_price: Option<EbayRangeFrom>,
}

#[derive(Debug, Deserialize)]
pub struct EbayRangeFrom {
    pub extracted: Option<f64>,
}

impl EbayResult {
    /// Normalizes into a [`ProductRecord`]; results without a title are dropped.
    pub fn into_record(self) -> Option<ProductRecord> {
        let price = self.price.and_then(|p| {
            p.extracted.or_else(|| p.from_price.and_then(|f| f.extracted))
        });

        Some(ProductRecord { title: self.title?, price, thumbnail: self.thumbnail, link: self.link })
    }
}
