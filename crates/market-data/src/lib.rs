//! Coinlink Market Data Crate
//!
//! This crate maps cryptocurrency ticker symbols (`BTC`, `kPEPE`, `LOOKBRO`)
//! to canonical CoinGecko coin ids and reference-site links.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Manual and curated static overrides
//! - Fuzzy matching against the full coin catalog with seven weighted strategies
//! - Market-cap ranking of candidates and a false-positive guard for short symbols
//! - Building and refreshing override tables from market listings
//! - Rate limiting of outgoing provider calls
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Input symbols   | --> |  OverrideChain   |  (manual, then static table)
//! +------------------+     +------------------+
//!                                  | miss
//!                                  v
//!                          +------------------+
//!                          | CatalogProvider  |  (one fetch per batch)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Candidates     |  (seven strategies)
//!                          +------------------+
//!                                  |
//!                                  v
//!                       +----------------------+
//!                       | MarketWeightProvider |  (chunks of 250 ids)
//!                       +----------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ResolutionResult |  (one per input symbol)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CoinResolver`] - Batch resolver over a catalog and a weight provider
//! - [`ResolutionResult`] - Outcome for one input symbol
//! - [`CatalogEntry`] / [`CatalogSnapshot`] - The coin catalog
//! - [`MarketWeights`] - Market capitalization per canonical id
//! - [`MatchStrategy`] - Match strategies and their base weights
//! - [`OverrideTable`] / [`ManualOverrides`] - Override sources

pub mod errors;
pub mod mapping;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    reference_link, CatalogEntry, CatalogSnapshot, CoinMarket, MarketWeights,
    MatchStrategy, ResolutionResult, ResolutionSource, NOT_FOUND,
};

// Re-export resolver types
pub use resolver::{
    CoinResolver, ManualOverrides, OverrideChain, OverrideTable, Resolver, ResolverConfig,
    SymbolQuery, MISSING_ID,
};

// Re-export provider types
pub use provider::{
    CatalogProvider, CoinGeckoProvider, MarketListingProvider, MarketWeightProvider, RateLimit,
    RateLimiter,
};

pub use errors::{MarketDataError, RetryClass};
