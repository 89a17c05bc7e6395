//! Candidate scoring and selection.
//!
//! `final = base + 10 * log10(max(market_cap, 1))`, where the base weight of a
//! fuzzy strategy is halved for short symbols. The highest final score wins;
//! on exact ties the first candidate wins.

use crate::models::{reference_link, MarketWeights, MatchStrategy, ResolutionResult, ResolutionSource};

use super::candidates::MatchCandidate;
use super::query::SymbolQuery;

/// Fuzzy wins on short symbols below this score are rejected.
pub const MIN_SHORT_FUZZY_SCORE: f64 = 100.0;

/// Penalty factor for fuzzy strategies on short symbols.
const SHORT_FUZZY_PENALTY: f64 = 0.5;

/// A candidate with its market weight and final score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub candidate: MatchCandidate<'a>,
    pub market_weight: f64,
    pub final_score: f64,
}

/// Outcome of selection for one symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection<'a> {
    /// No candidate survived generation.
    NoCandidates,
    /// The best candidate looked like a false positive.
    Rejected(ScoredCandidate<'a>),
    /// The best candidate was accepted.
    Winner(ScoredCandidate<'a>),
}

impl Selection<'_> {
    /// Turn the selection into the result reported for `query`.
    pub fn into_result(self, query: &SymbolQuery) -> ResolutionResult {
        match self {
            Selection::NoCandidates | Selection::Rejected(_) => {
                ResolutionResult::not_found(query.raw.clone())
            }
            Selection::Winner(scored) => {
                let entry = scored.candidate.entry;
                let strategy = scored.candidate.strategy;
                ResolutionResult {
                    symbol: query.raw.clone(),
                    canonical_id: entry.canonical_id.clone(),
                    reference_link: reference_link(&entry.canonical_id),
                    is_fuzzy: strategy != MatchStrategy::ExactSymbol,
                    matched_symbol: Some(entry.symbol.clone()),
                    score: Some(scored.final_score),
                    strategy: Some(strategy),
                    source: ResolutionSource::Catalog,
                }
            }
        }
    }
}

/// `10 * log10(max(weight, 1))`; 0 for unknown or tiny weights.
pub fn market_score(weight: f64) -> f64 {
    10.0 * weight.max(1.0).log10()
}

/// Score one candidate for `query`.
pub fn score_candidate<'a>(
    query: &SymbolQuery,
    candidate: MatchCandidate<'a>,
    weights: &MarketWeights,
) -> ScoredCandidate<'a> {
    let mut base = candidate.base_weight;
    if query.is_short() && !candidate.strategy.is_exact() {
        base *= SHORT_FUZZY_PENALTY;
    }

    let market_weight = weights.get(&candidate.entry.canonical_id);
    ScoredCandidate {
        candidate,
        market_weight,
        final_score: base + market_score(market_weight),
    }
}

/// Score every candidate, keeping input order.
pub fn score_candidates<'a>(
    query: &SymbolQuery,
    candidates: &[MatchCandidate<'a>],
    weights: &MarketWeights,
) -> Vec<ScoredCandidate<'a>> {
    candidates
        .iter()
        .map(|c| score_candidate(query, *c, weights))
        .collect()
}

/// Highest final score; the earliest candidate wins ties.
pub fn best<'a>(scored: &[ScoredCandidate<'a>]) -> Option<ScoredCandidate<'a>> {
    scored.iter().copied().fold(None, |best, current| match best {
        Some(b) if current.final_score <= b.final_score => Some(b),
        _ => Some(current),
    })
}

/// Whether a winning candidate for a short symbol is too weak to report.
///
/// Exact-symbol wins are always kept.
pub fn is_false_positive(query: &SymbolQuery, winner: &ScoredCandidate<'_>) -> bool {
    let entry = winner.candidate.entry;
    query.is_short()
        && winner.candidate.strategy != MatchStrategy::ExactSymbol
        && winner.final_score < MIN_SHORT_FUZZY_SCORE
        && entry.symbol.to_uppercase() != query.upper
        && entry.canonical_id.to_lowercase() != query.lower
}

/// Pick at most one winner from already scored candidates.
pub fn select<'a>(query: &SymbolQuery, scored: &[ScoredCandidate<'a>]) -> Selection<'a> {
    match best(scored) {
        None => Selection::NoCandidates,
        Some(winner) if is_false_positive(query, &winner) => Selection::Rejected(winner),
        Some(winner) => Selection::Winner(winner),
    }
}
