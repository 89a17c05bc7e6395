use serde::{Deserialize, Serialize};

use super::strategy::MatchStrategy;
use super::types::reference_link;

/// Placeholder id reported for symbols that could not be resolved.
pub const NOT_FOUND: &str = "Not found";

/// Where a resolution came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Caller-supplied `SYMBOL:id` override.
    ManualOverride,
    /// Curated static override table.
    StaticTable,
    /// Scored match against the catalog.
    Catalog,
    /// Nothing matched, or the match was rejected.
    Unresolved,
}

/// One resolution per input symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Input symbol, trimmed, casing preserved
    pub symbol: String,

    /// Winning canonical id, or [`NOT_FOUND`]
    pub canonical_id: String,

    /// Reference-site link, empty when unresolved
    pub reference_link: String,

    /// True unless the match was an exact symbol match or an override
    pub is_fuzzy: bool,

    /// Symbol of the entry that matched, as the catalog lists it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_symbol: Option<String>,

    /// Final score of the winning candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Strategy of the winning candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,

    pub source: ResolutionSource,
}

impl ResolutionResult {
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            canonical_id: NOT_FOUND.to_string(),
            reference_link: String::new(),
            is_fuzzy: false,
            matched_symbol: None,
            score: None,
            strategy: None,
            source: ResolutionSource::Unresolved,
        }
    }

    /// Result for an override hit. Overrides are never fuzzy.
    pub fn from_override(
        symbol: impl Into<String>,
        canonical_id: impl Into<String>,
        matched_symbol: Option<String>,
        source: ResolutionSource,
    ) -> Self {
        let canonical_id = canonical_id.into();
        Self {
            symbol: symbol.into(),
            reference_link: reference_link(&canonical_id),
            canonical_id,
            is_fuzzy: false,
            matched_symbol,
            score: None,
            strategy: None,
            source,
        }
    }

    pub fn is_found(&self) -> bool {
        self.source != ResolutionSource::Unresolved
    }
}
