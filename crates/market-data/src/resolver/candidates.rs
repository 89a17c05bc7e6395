//! Candidate generation against the catalog.

use crate::models::{CatalogEntry, MatchStrategy};

use super::query::SymbolQuery;
use super::strategy;

/// A catalog entry that matched a symbol under one strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate<'a> {
    pub entry: &'a CatalogEntry,
    pub strategy: MatchStrategy,
    pub base_weight: f64,
}

/// All candidates for `query`, strategy-major: every exact-symbol match in
/// catalog order, then every exact-id match, and so on.
///
/// The same entry may appear several times under different strategies.
pub fn generate_candidates<'a>(
    query: &SymbolQuery,
    catalog: &'a [CatalogEntry],
) -> Vec<MatchCandidate<'a>> {
    if query.is_empty() {
        return Vec::new();
    }

    MatchStrategy::ALL
        .into_iter()
        .flat_map(|kind| {
            catalog
                .iter()
                .filter(move |entry| strategy::matches(kind, query, entry))
                .map(move |entry| MatchCandidate {
                    entry,
                    strategy: kind,
                    base_weight: kind.base_weight(),
                })
        })
        .collect()
}

/// Drop every non-exact-symbol candidate when at least one exact-symbol
/// candidate exists.
pub fn retain_exact_symbol(candidates: &mut Vec<MatchCandidate<'_>>) {
    if candidates
        .iter()
        .any(|c| c.strategy == MatchStrategy::ExactSymbol)
    {
        candidates.retain(|c| c.strategy == MatchStrategy::ExactSymbol);
    }
}
