use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use coinlink_market_data::{
    CatalogEntry, CatalogProvider, CatalogSnapshot, CoinResolver, MarketDataError,
    MarketWeightProvider, MarketWeights, OverrideTable, ResolverConfig,
};
use coinlink_server::{api::app_router, config::Config, AppState};

pub struct FixtureProvider {
    entries: Vec<CatalogEntry>,
    weights: Vec<(String, f64)>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self {
            entries: vec![
                CatalogEntry::new("btc", "batcat", "BatCat"),
                CatalogEntry::new("btc", "bitcoin", "Bitcoin"),
                CatalogEntry::new("look", "look-bro", "Look-Bro"),
                CatalogEntry::new("pepe", "pepe", "Pepe"),
            ],
            weights: vec![
                ("bitcoin".to_string(), 1.2e12),
                ("batcat".to_string(), 10.0),
                ("pepe".to_string(), 4.0e9),
            ],
        }
    }
}

#[async_trait]
impl CatalogProvider for FixtureProvider {
    fn id(&self) -> &'static str {
        "FIXTURE"
    }

    async fn fetch_catalog(&self) -> Result<CatalogSnapshot, MarketDataError> {
        Ok(CatalogSnapshot::new(self.entries.clone()))
    }
}

#[async_trait]
impl MarketWeightProvider for FixtureProvider {
    fn id(&self) -> &'static str {
        "FIXTURE"
    }

    async fn fetch_weights(&self, ids: &[String]) -> Result<MarketWeights, MarketDataError> {
        Ok(self
            .weights
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .cloned()
            .collect())
    }
}

pub fn test_router(config: &Config) -> Router {
    let provider = Arc::new(FixtureProvider::new());
    router_with(config, provider.clone(), provider)
}

pub fn router_with(
    config: &Config,
    catalog: Arc<dyn CatalogProvider>,
    weights: Arc<dyn MarketWeightProvider>,
) -> Router {
    let resolver_config = ResolverConfig::default()
        .with_fetch_timeout(config.fetch_timeout)
        .with_batch_deadline(config.batch_deadline);
    let resolver = CoinResolver::new(catalog, weights)
        .with_static_overrides(OverrideTable::from_pairs([("ETH", "ethereum")]))
        .with_config(resolver_config);
    app_router(Arc::new(AppState::new(resolver)), config)
}
