use serde::{Deserialize, Serialize};

/// One row of a market listing (CoinGecko `/coins/markets`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    /// USD market cap; null for coins without market data
    #[serde(default)]
    pub market_cap: Option<f64>,
}
