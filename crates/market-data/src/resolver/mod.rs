//! Symbol resolution: ticker symbols to canonical coin ids.
//!
//! # Architecture
//!
//! Resolution runs in two passes over a batch:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CoinResolver                          │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ 1. OverrideChain                                        │ │
//! │  │    - ManualOverrides (per request, SYMBOL:id)           │ │
//! │  │    - OverrideTable (curated, static)                    │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! │                           │ miss                             │
//! │                           ▼                                  │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ 2. Catalog matching                                     │ │
//! │  │    - generate_candidates (seven strategies)             │ │
//! │  │    - market weights for surviving candidate ids         │ │
//! │  │    - score, select, false-positive guard                │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use coinlink_market_data::provider::CoinGeckoProvider;
//! use coinlink_market_data::resolver::{CoinResolver, ManualOverrides, OverrideTable};
//!
//! let provider = Arc::new(CoinGeckoProvider::new(None));
//! let resolver = CoinResolver::new(provider.clone(), provider)
//!     .with_static_overrides(OverrideTable::builtin());
//!
//! let results = resolver
//!     .resolve(&["BTC", "LOOKBRO"], &ManualOverrides::parse("PEPE:pepe"))
//!     .await;
//! // results[0].canonical_id == "bitcoin" (static table)
//! // results[1].canonical_id == "look-bro" (fuzzy, id_is_hyphenated_ticker)
//! ```

mod candidates;
mod chain;
mod engine;
mod overrides;
mod query;
mod scorer;
mod strategy;
mod traits;

pub use candidates::{generate_candidates, retain_exact_symbol, MatchCandidate};
pub use chain::OverrideChain;
pub use engine::{
    fetch_weights_chunked, CoinResolver, ResolverConfig, DEFAULT_BATCH_DEADLINE,
    DEFAULT_FETCH_TIMEOUT,
};
pub use overrides::{write_ordered_table, ManualOverrides, OverrideTable, MISSING_ID};
pub use query::{normalize_symbol, SymbolQuery, SHORT_SYMBOL_MAX_LEN};
pub use scorer::{
    best, is_false_positive, market_score, score_candidate, score_candidates, select,
    ScoredCandidate, Selection, MIN_SHORT_FUZZY_SCORE,
};
pub use strategy::matches;
pub use traits::Resolver;
