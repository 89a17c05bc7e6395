//! Market data models
//!
//! This module contains the core data types for symbol resolution:
//! - `types` - The reference-link builder
//! - `catalog` - Catalog entries and the immutable catalog snapshot
//! - `weights` - Market capitalization per canonical id
//! - `market` - Market listing rows used to build override tables
//! - `strategy` - Match strategies and their base weights
//! - `resolution` - Per-symbol resolution results

mod catalog;
mod market;
mod resolution;
mod strategy;
mod types;
mod weights;

pub use catalog::{CatalogEntry, CatalogSnapshot};
pub use market::CoinMarket;
pub use resolution::{ResolutionResult, ResolutionSource, NOT_FOUND};
pub use strategy::MatchStrategy;
pub use types::{reference_link, REFERENCE_BASE_URL};
pub use weights::MarketWeights;
