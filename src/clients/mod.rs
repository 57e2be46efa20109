//! Catalog access: the provider trait and its browser-backed client.

mod catalog_client;

use crate::models::catalog::RawRow;
use anyhow::Result;

pub use catalog_client::CatalogClient;

/// Source of listing rows for a description filter. The production
/// implementation drives the admin panel; tests substitute a fixture.
#[allow(async_fn_in_trait)]
pub trait SearchProvider {
    async fn fetch_rows(&self, query: &str, page: u32) -> Result<Vec<RawRow>>;
}
