//! CoinGecko API response structures.

use serde::Deserialize;

/// Item of `/coins/markets`. Only the fields we use are decoded.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Error envelope returned by CoinGecko on failures.
///
/// The public API answers `{"status": {"error_code": 429, "error_message": "..."}}`,
/// the pro API `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ErrorResponse {
    pub fn message(self) -> Option<String> {
        self.error
            .or_else(|| self.status.and_then(|s| s.error_message))
    }
}
