//! Override table generation from the market-cap ordered listing.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::errors::RetryClass;
use crate::models::CoinMarket;
use crate::provider::MarketListingProvider;
use crate::resolver::OverrideTable;

/// Paging parameters for [`fetch_top_coins`].
#[derive(Clone, Debug)]
pub struct ListingConfig {
    /// Total number of coins to fetch
    pub limit: usize,
    /// Coins per page
    pub per_page: u32,
    /// Wait between successful pages
    pub page_delay: Duration,
    /// Wait before retrying a rate-limited page
    pub rate_limit_delay: Duration,
    /// Retries per page before giving up
    pub max_retries: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            limit: 2000,
            per_page: 100,
            page_delay: Duration::from_secs(5),
            rate_limit_delay: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl ListingConfig {
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.limit.div_ceil(self.per_page as usize) as u32
    }
}

/// Fetch the top `limit` coins by market cap, page by page.
///
/// Rate-limited pages are retried after `rate_limit_delay`. Any other error
/// stops paging; whatever was fetched so far is returned.
pub async fn fetch_top_coins(
    provider: &dyn MarketListingProvider,
    config: &ListingConfig,
) -> Vec<CoinMarket> {
    let total_pages = config.total_pages();
    let mut coins: Vec<CoinMarket> = Vec::with_capacity(config.limit);
    let mut page = 1;
    let mut retries = 0;

    while page <= total_pages {
        info!("Fetching page {} of {}", page, total_pages);

        match provider.fetch_markets_page(page, config.per_page).await {
            Ok(batch) => {
                retries = 0;
                let fetched = batch.len();
                coins.extend(batch);

                if coins.len() >= config.limit {
                    coins.truncate(config.limit);
                    break;
                }
                if fetched == 0 {
                    info!("Listing ended at page {}", page);
                    break;
                }
                if page < total_pages && !config.page_delay.is_zero() {
                    tokio::time::sleep(config.page_delay).await;
                }
                page += 1;
            }
            Err(e) if e.retry_class() == RetryClass::WithBackoff && retries < config.max_retries => {
                retries += 1;
                warn!(
                    "Page {} from '{}' failed: {}, retrying in {:?} ({}/{})",
                    page,
                    provider.id(),
                    e,
                    config.rate_limit_delay,
                    retries,
                    config.max_retries
                );
                tokio::time::sleep(config.rate_limit_delay).await;
            }
            Err(e) => {
                error!("Error fetching page {}: {}", page, e);
                break;
            }
        }
    }

    coins
}

/// `SYMBOL -> id`, keeping the first occurrence of each uppercased symbol.
///
/// With a listing ordered by market cap, the first occurrence is the largest coin.
pub fn build_override_table(coins: &[CoinMarket]) -> OverrideTable {
    let mut first_seen: BTreeMap<String, &str> = BTreeMap::new();
    for coin in coins {
        first_seen
            .entry(coin.symbol.trim().to_uppercase())
            .or_insert(coin.id.as_str());
    }
    OverrideTable::from_pairs(first_seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn coin(id: &str, symbol: &str) -> CoinMarket {
        CoinMarket {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: id.to_string(),
            market_cap: None,
        }
    }

    /// Answers each call with the next scripted response.
    struct ScriptedListing {
        responses: Mutex<Vec<Result<Vec<CoinMarket>, MarketDataError>>>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedListing {
        fn new(mut responses: Vec<Result<Vec<CoinMarket>, MarketDataError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MarketListingProvider for ScriptedListing {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn fetch_markets_page(
            &self,
            page: u32,
            _per_page: u32,
        ) -> Result<Vec<CoinMarket>, MarketDataError> {
            self.requested.lock().unwrap().push(page);
            self.responses.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }
    }

    fn fast_config(limit: usize, per_page: u32) -> ListingConfig {
        ListingConfig {
            limit,
            per_page,
            page_delay: Duration::ZERO,
            rate_limit_delay: Duration::ZERO,
            max_retries: 2,
        }
    }

    fn rate_limited() -> MarketDataError {
        MarketDataError::RateLimited {
            provider: "SCRIPTED".to_string(),
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(fast_config(2000, 100).total_pages(), 20);
        assert_eq!(fast_config(250, 100).total_pages(), 3);
        assert_eq!(fast_config(10, 0).total_pages(), 0);
    }

    #[tokio::test]
    async fn test_fetch_truncates_to_limit() {
        let provider = ScriptedListing::new(vec![
            Ok(vec![coin("a", "a"), coin("b", "b")]),
            Ok(vec![coin("c", "c"), coin("d", "d")]),
        ]);
        let coins = fetch_top_coins(&provider, &fast_config(3, 2)).await;
        let ids: Vec<&str> = coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_rate_limited_page_is_retried() {
        let provider = ScriptedListing::new(vec![
            Ok(vec![coin("a", "a")]),
            Err(rate_limited()),
            Ok(vec![coin("b", "b")]),
        ]);
        let coins = fetch_top_coins(&provider, &fast_config(2, 1)).await;

        assert_eq!(coins.len(), 2);
        assert_eq!(*provider.requested.lock().unwrap(), vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let provider = ScriptedListing::new(vec![
            Ok(vec![coin("a", "a")]),
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
            Ok(vec![coin("b", "b")]),
        ]);
        let coins = fetch_top_coins(&provider, &fast_config(5, 1)).await;

        assert_eq!(coins.len(), 1);
        assert_eq!(*provider.requested.lock().unwrap(), vec![1, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_other_errors_stop_paging() {
        let provider = ScriptedListing::new(vec![
            Ok(vec![coin("a", "a")]),
            Err(MarketDataError::ProviderError {
                provider: "SCRIPTED".to_string(),
                message: "HTTP 500".to_string(),
            }),
            Ok(vec![coin("b", "b")]),
        ]);
        let coins = fetch_top_coins(&provider, &fast_config(5, 1)).await;
        assert_eq!(coins.len(), 1);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let coins = vec![
            coin("bitcoin", "btc"),
            coin("ethereum", "eth"),
            coin("batcat", "BTC"),
        ];
        let table = build_override_table(&coins);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("BTC"), Some("bitcoin"));
        assert_eq!(table.get("ETH"), Some("ethereum"));
    }
}
