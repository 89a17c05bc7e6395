//! Provider trait definitions.
//!
//! The resolver depends only on these traits; concrete HTTP providers live in
//! submodules of [`crate::provider`].

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{CatalogSnapshot, CoinMarket, MarketWeights};

/// Maximum number of ids per market-weight request.
pub const MAX_IDS_PER_REQUEST: usize = 250;

/// Source of the bulk coin catalog.
///
/// # Example
///
/// ```ignore
/// struct FixedCatalog(Vec<CatalogEntry>);
///
/// #[async_trait]
/// impl CatalogProvider for FixedCatalog {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_catalog(&self) -> Result<CatalogSnapshot, MarketDataError> {
///         Ok(CatalogSnapshot::new(self.0.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch the full list of known coins.
    async fn fetch_catalog(&self) -> Result<CatalogSnapshot, MarketDataError>;
}

/// Source of market capitalization per canonical id.
#[async_trait]
pub trait MarketWeightProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch weights for at most [`MAX_IDS_PER_REQUEST`] ids.
    ///
    /// Ids the provider does not know are simply absent from the result.
    async fn fetch_weights(&self, ids: &[String]) -> Result<MarketWeights, MarketDataError>;
}

/// Paged market listing ordered by market cap, descending.
#[async_trait]
pub trait MarketListingProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Fetch one page (1-based) of the listing.
    async fn fetch_markets_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CoinMarket>, MarketDataError>;
}
