//! Match predicates, one per [`MatchStrategy`].
//!
//! Each predicate is pure: it looks at one query and one catalog entry.
//! Adding a strategy means adding an enum variant, its weight, and an arm here.

use crate::models::{CatalogEntry, MatchStrategy};

use super::query::SymbolQuery;

/// A symbol shorter than this share of a name token, and contained in it,
/// is considered an accidental substring rather than a word.
const SUBSTRING_RATIO: f64 = 0.7;

/// Whether `entry` matches `query` under `strategy`.
pub fn matches(strategy: MatchStrategy, query: &SymbolQuery, entry: &CatalogEntry) -> bool {
    match strategy {
        MatchStrategy::ExactSymbol => entry.symbol.to_uppercase() == query.upper,
        MatchStrategy::ExactId => entry.canonical_id == query.lower,
        MatchStrategy::IdContainsTicker => {
            format!("-{}-", entry.canonical_id).contains(&format!("-{}-", query.lower))
        }
        MatchStrategy::IdIsHyphenatedTicker => entry.canonical_id.replace('-', "") == query.lower,
        MatchStrategy::NameWord => {
            name_contains_word(&entry.display_name.to_uppercase(), &query.upper)
        }
        MatchStrategy::NamePrefix => {
            let name = entry.display_name.to_uppercase();
            name.contains('-') && name.split('-').next() == Some(query.upper.as_str())
        }
        MatchStrategy::NameParts => {
            let name = entry.display_name.to_uppercase();
            name.contains('-') && name.split('-').collect::<String>() == query.upper
        }
    }
}

/// `ticker` is a whole token of `name` (split on `-` or on spaces), and is not
/// a short fragment of some longer token.
fn name_contains_word(name: &str, ticker: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    let words: Vec<&str> = name.split(' ').collect();

    if !parts.contains(&ticker) && !words.contains(&ticker) {
        return false;
    }

    let ticker_len = ticker.chars().count() as f64;
    !parts.iter().chain(words.iter()).any(|token| {
        *token != ticker
            && token.contains(ticker)
            && ticker_len < token.chars().count() as f64 * SUBSTRING_RATIO
    })
}
