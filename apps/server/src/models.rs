use coinlink_market_data::{MatchStrategy, ResolutionResult, ResolutionSource};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Comma-separated ticker list, e.g. `"BTC, eth, kPEPE"`
    #[serde(default)]
    pub target_tickers: String,
    /// Comma-separated `SYMBOL:id` pairs
    #[serde(default)]
    pub manual_overrides: String,
}

impl GenerateRequest {
    /// Tickers split on `,`, trimmed, empties dropped.
    pub fn tickers(&self) -> Vec<&str> {
        self.target_tickers
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// One row of the `/generate` response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TickerLink {
    pub ticker: String,
    pub token_id: String,
    pub link: String,
    pub fuzzy_match: bool,
    pub matched_ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchStrategy>,
    pub source: ResolutionSource,
}

impl From<ResolutionResult> for TickerLink {
    fn from(r: ResolutionResult) -> Self {
        Self {
            ticker: r.symbol,
            token_id: r.canonical_id,
            link: r.reference_link,
            fuzzy_match: r.is_fuzzy,
            matched_ticker: r.matched_symbol,
            match_score: r.score,
            match_type: r.strategy,
            source: r.source,
        }
    }
}
