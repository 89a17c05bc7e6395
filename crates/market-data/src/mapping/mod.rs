//! Override table maintenance.
//!
//! - [`generate`]: build a table from the top coins by market cap
//! - [`refresh`]: re-match a fixed list of target symbols and merge with the
//!   current table, marking unresolved targets with [`MISSING_ID`](crate::resolver::MISSING_ID)

pub mod generate;
pub mod refresh;

pub use generate::{build_override_table, fetch_top_coins, ListingConfig};
pub use refresh::{
    build_refreshed_mapping, dedup_targets, find_best_match, matching_tier, merge_mappings,
    refresh_mapping, RefreshOutcome, DEFAULT_TARGET_SYMBOLS, REFRESH_MANUAL_OVERRIDES,
};
