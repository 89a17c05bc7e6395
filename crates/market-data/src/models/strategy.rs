use std::fmt;

use serde::{Deserialize, Serialize};

/// How a catalog entry was matched against a symbol.
///
/// The serialized names are part of the HTTP response format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Entry symbol equals the input, case-insensitive.
    ExactSymbol,
    /// Canonical id equals the lowercased input.
    #[serde(rename = "exact_id_match")]
    ExactId,
    /// `-{id}-` contains `-{input}-`.
    #[serde(rename = "id_contains_ticker_with_boundaries")]
    IdContainsTicker,
    /// Canonical id with hyphens removed equals the lowercased input.
    #[serde(rename = "id_is_hyphenated_ticker")]
    IdIsHyphenatedTicker,
    /// Input is a whole word of the display name.
    #[serde(rename = "name_contains_ticker_as_word")]
    NameWord,
    /// Input is the first segment of a hyphenated display name.
    #[serde(rename = "name_starts_with_ticker")]
    NamePrefix,
    /// Segments of a hyphenated display name concatenate to the input.
    #[serde(rename = "name_parts_form_ticker")]
    NameParts,
}

impl MatchStrategy {
    /// Every strategy, in candidate-generation order.
    pub const ALL: [MatchStrategy; 7] = [
        MatchStrategy::ExactSymbol,
        MatchStrategy::ExactId,
        MatchStrategy::IdContainsTicker,
        MatchStrategy::IdIsHyphenatedTicker,
        MatchStrategy::NameWord,
        MatchStrategy::NamePrefix,
        MatchStrategy::NameParts,
    ];

    /// Confidence weight before any market adjustment.
    pub fn base_weight(self) -> f64 {
        match self {
            Self::ExactSymbol => 100.0,
            Self::ExactId => 95.0,
            Self::IdContainsTicker => 90.0,
            Self::IdIsHyphenatedTicker => 95.0,
            Self::NameWord => 50.0,
            Self::NamePrefix => 75.0,
            Self::NameParts => 85.0,
        }
    }

    /// Strategies that keep full weight on short tickers.
    pub fn is_exact(self) -> bool {
        matches!(self, Self::ExactSymbol | Self::ExactId)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactSymbol => "exact_symbol",
            Self::ExactId => "exact_id_match",
            Self::IdContainsTicker => "id_contains_ticker_with_boundaries",
            Self::IdIsHyphenatedTicker => "id_is_hyphenated_ticker",
            Self::NameWord => "name_contains_ticker_as_word",
            Self::NamePrefix => "name_starts_with_ticker",
            Self::NameParts => "name_parts_form_ticker",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
