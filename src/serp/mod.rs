//! Search-service integration: marketplaces, HTTP client, and response decoding.

pub mod client;
pub mod marketplaces;
pub mod models;
pub mod parser;

pub use client::{SerpClient, SerpError, SerpSearch};
pub use marketplaces::Marketplace;
pub use models::ProductRecord;
