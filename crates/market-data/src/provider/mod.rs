//! Provider abstractions and implementations.
//!
//! This module contains:
//! - The `CatalogProvider`, `MarketWeightProvider` and `MarketListingProvider` traits
//! - Rate limiting configuration and the token bucket limiter
//! - The CoinGecko implementation of all three traits
//!
//! The resolver only sees the traits. Failures are returned as
//! `MarketDataError` and the resolver decides how to degrade.

mod capabilities;
mod rate_limiter;
mod traits;

pub mod coingecko;

pub use capabilities::RateLimit;
pub use coingecko::CoinGeckoProvider;
pub use rate_limiter::RateLimiter;
pub use traits::{CatalogProvider, MarketListingProvider, MarketWeightProvider, MAX_IDS_PER_REQUEST};
