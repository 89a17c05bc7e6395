//! CoinGecko provider implementation.
//!
//! Serves all three provider traits:
//! - Catalog via `/coins/list`
//! - Market weights via `/coins/markets?ids=...`
//! - Market-cap ordered listing via `/coins/markets?order=market_cap_desc`
//!
//! Without an API key the public API is used; with a key the pro API and the
//! `x-cg-pro-api-key` header.
//! API documentation: https://docs.coingecko.com/reference/introduction

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::errors::MarketDataError;
use crate::models::{CatalogEntry, CatalogSnapshot, CoinMarket, MarketWeights};
use crate::provider::{
    CatalogProvider, MarketListingProvider, MarketWeightProvider, RateLimit, RateLimiter,
    MAX_IDS_PER_REQUEST,
};

use self::models::{ErrorResponse, MarketItem};

const PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";
const PRO_KEY_HEADER: &str = "x-cg-pro-api-key";
const PROVIDER_ID: &str = "COINGECKO";

/// CoinGecko catalog and market data provider.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limiter: RateLimiter,
}

impl CoinGeckoProvider {
    /// Create a provider for the public API, or the pro API when a key is given.
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let (base_url, limit) = match api_key {
            Some(_) => (PRO_BASE_URL, RateLimit::coingecko_pro()),
            None => (PUBLIC_BASE_URL, RateLimit::coingecko_public()),
        };
        Self::with_base_url(base_url, api_key, limit)
    }

    /// Create a provider against a custom base URL (proxies, test servers).
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>, limit: RateLimit) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            limiter: RateLimiter::new(PROVIDER_ID, limit),
        }
    }

    /// GET `endpoint` with query params and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params);

        if let Some(key) = &self.api_key {
            request = request.header(PRO_KEY_HEADER, key);
        }

        debug!("CoinGecko request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        check_status(status, &body)?;

        serde_json::from_str(&body).map_err(|e| MarketDataError::InvalidResponse {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })
    }
}

/// Map HTTP failures onto [`MarketDataError`].
fn check_status(status: StatusCode, body: &str) -> Result<(), MarketDataError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: PROVIDER_ID.to_string(),
        });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: "Invalid or missing API key".to_string(),
        });
    }

    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    Err(MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: format!("HTTP {}: {}", status.as_u16(), detail),
    })
}

#[async_trait]
impl CatalogProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_catalog(&self) -> Result<CatalogSnapshot, MarketDataError> {
        info!("Fetching coin list from CoinGecko");
        let entries: Vec<CatalogEntry> = self
            .fetch("/coins/list", &[("include_platform", "false".to_string())])
            .await?;
        info!("Fetched {} coins from CoinGecko", entries.len());
        Ok(CatalogSnapshot::new(entries))
    }
}

#[async_trait]
impl MarketWeightProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_weights(&self, ids: &[String]) -> Result<MarketWeights, MarketDataError> {
        if ids.is_empty() {
            return Ok(MarketWeights::new());
        }
        if ids.len() > MAX_IDS_PER_REQUEST {
            warn!(
                "CoinGecko weight request for {} ids exceeds page size {}, extra ids are dropped",
                ids.len(),
                MAX_IDS_PER_REQUEST
            );
        }

        let params = [
            ("vs_currency", "usd".to_string()),
            ("ids", ids.join(",")),
            ("per_page", MAX_IDS_PER_REQUEST.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ];
        let items: Vec<MarketItem> = self.fetch("/coins/markets", &params).await?;

        let mut weights = MarketWeights::new();
        for item in items {
            weights.insert(item.id, item.market_cap);
        }
        Ok(weights)
    }
}

#[async_trait]
impl MarketListingProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_markets_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CoinMarket>, MarketDataError> {
        let params = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("sparkline", "false".to_string()),
        ];
        let items: Vec<MarketItem> = self.fetch("/coins/markets", &params).await?;

        Ok(items
            .into_iter()
            .map(|item| CoinMarket {
                id: item.id,
                symbol: item.symbol,
                name: item.name,
                market_cap: item.market_cap,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pro_api_selected_by_key() {
        let public = CoinGeckoProvider::new(None);
        assert_eq!(public.base_url, PUBLIC_BASE_URL);

        let blank = CoinGeckoProvider::new(Some("  ".to_string()));
        assert_eq!(blank.base_url, PUBLIC_BASE_URL);
        assert!(blank.api_key.is_none());

        let pro = CoinGeckoProvider::new(Some("key".to_string()));
        assert_eq!(pro.base_url, PRO_BASE_URL);
    }

    #[test]
    fn test_check_status_rate_limited() {
        let err = check_status(StatusCode::TOO_MANY_REQUESTS, "").unwrap_err();
        assert!(matches!(err, MarketDataError::RateLimited { .. }));
    }

    #[test]
    fn test_check_status_extracts_public_error_message() {
        let body = r#"{"status": {"error_code": 500, "error_message": "upstream down"}}"#;
        let err = check_status(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error: COINGECKO - HTTP 500: upstream down"
        );
    }

    #[test]
    fn test_check_status_unauthorized() {
        let err = check_status(StatusCode::UNAUTHORIZED, r#"{"error": "bad key"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error: COINGECKO - Invalid or missing API key"
        );
    }

    #[test]
    fn test_market_item_parsing() {
        let json = r#"[
            {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 60000.0, "market_cap": 1200000000000},
            {"id": "ghost", "symbol": "gst", "name": "Ghost", "market_cap": null}
        ]"#;
        let items: Vec<MarketItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].market_cap, Some(1.2e12));
        assert_eq!(items[1].market_cap, None);
    }
}
