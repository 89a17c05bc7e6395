//! Rate limiting configuration for providers.

use std::time::Duration;

/// Controls how aggressively we can call a provider to avoid
/// hitting their rate limits and getting blocked.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Requests that may be sent back to back before pacing kicks in.
    pub burst: u32,

    /// Minimum delay between two consecutive requests.
    pub min_delay: Duration,
}

impl RateLimit {
    /// Public (keyless) CoinGecko API: roughly 30 calls per minute.
    pub fn coingecko_public() -> Self {
        Self {
            requests_per_minute: 30,
            burst: 3,
            min_delay: Duration::from_millis(500),
        }
    }

    /// Pro CoinGecko API.
    pub fn coingecko_pro() -> Self {
        Self {
            requests_per_minute: 500,
            burst: 10,
            min_delay: Duration::from_millis(100),
        }
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst: 5,
            min_delay: Duration::from_millis(100),
        }
    }
}
