//! Override tables - the first stage of resolution.
//!
//! Two kinds of override feed the chain:
//! - [`ManualOverrides`]: caller-supplied `SYMBOL:id` pairs for one request
//! - [`OverrideTable`]: the curated, pre-verified static table
//!
//! Keys are compared uppercased. Ids are kept as given.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

use crate::errors::MarketDataError;
use crate::models::{ResolutionResult, ResolutionSource};

use super::query::SymbolQuery;
use super::traits::Resolver;

/// Placeholder written by the refresh job for symbols it could not resolve.
/// Never loaded as a real mapping.
pub const MISSING_ID: &str = "MISSING_ID";

/// Pre-verified mappings shipped with the crate.
const BUILTIN_OVERRIDES: &[(&str, &str)] = &[
    ("AAVE", "aave"),
    ("ADA", "cardano"),
    ("ALGO", "algorand"),
    ("APT", "aptos"),
    ("ARB", "arbitrum"),
    ("ATOM", "cosmos"),
    ("AVAX", "avalanche-2"),
    ("BCH", "bitcoin-cash"),
    ("BNB", "binancecoin"),
    ("BTC", "bitcoin"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("ETC", "ethereum-classic"),
    ("ETH", "ethereum"),
    ("FIL", "filecoin"),
    ("HBAR", "hedera-hashgraph"),
    ("INJ", "injective-protocol"),
    ("KPEPE", "pepe"),
    ("LDO", "lido-dao"),
    ("LINK", "chainlink"),
    ("LTC", "litecoin"),
    ("NEAR", "near"),
    ("OP", "optimism"),
    ("SOL", "solana"),
    ("SUI", "sui"),
    ("TON", "the-open-network"),
    ("TRX", "tron"),
    ("UNI", "uniswap"),
    ("XLM", "stellar"),
    ("XRP", "ripple"),
];

/// Curated symbol -> canonical id table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, String>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_OVERRIDES.iter().copied())
    }

    /// Build a table from `(symbol, id)` pairs. Later pairs win on duplicate
    /// keys, blank entries and [`MISSING_ID`] placeholders are skipped.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries = BTreeMap::new();
        for (symbol, id) in pairs {
            let symbol = symbol.as_ref().trim().to_uppercase();
            let id = id.as_ref().trim();
            if symbol.is_empty() || id.is_empty() || id == MISSING_ID {
                continue;
            }
            entries.insert(symbol, id.to_string());
        }
        Self { entries }
    }

    /// Load a JSON object `{"SYMBOL": "id", ...}` from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MarketDataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MarketDataError::OverrideTable(format!("{}: {}", path.display(), e))
        })?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            MarketDataError::OverrideTable(format!("{}: {}", path.display(), e))
        })?;
        let table = Self::from_pairs(raw);
        info!(
            "Loaded {} static overrides from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Write the table as pretty JSON, keys sorted.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MarketDataError> {
        let pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        write_ordered_table(path, &pairs)
    }

    /// Look up an uppercased symbol.
    pub fn get(&self, symbol_upper: &str) -> Option<&str> {
        self.entries.get(symbol_upper).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolver for OverrideTable {
    fn name(&self) -> &'static str {
        "static_table"
    }

    fn resolve(&self, query: &SymbolQuery) -> Option<ResolutionResult> {
        let id = self.get(&query.upper)?;
        Some(ResolutionResult::from_override(
            query.raw.clone(),
            id,
            Some(query.upper.clone()),
            ResolutionSource::StaticTable,
        ))
    }
}

/// JSON object that keeps the order of the given pairs.
struct OrderedTable<'a>(&'a [(String, String)]);

impl Serialize for OrderedTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, id) in self.0 {
            map.serialize_entry(symbol, id)?;
        }
        map.end()
    }
}

/// Write `(symbol, id)` pairs as a pretty JSON object in the given order.
pub fn write_ordered_table(
    path: impl AsRef<Path>,
    pairs: &[(String, String)],
) -> Result<(), MarketDataError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&OrderedTable(pairs))
        .map_err(|e| MarketDataError::OverrideTable(e.to_string()))?;
    fs::write(path, json + "\n")
        .map_err(|e| MarketDataError::OverrideTable(format!("{}: {}", path.display(), e)))
}

/// Caller-supplied overrides for a single request.
///
/// These beat the static table and every computed match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualOverrides {
    entries: BTreeMap<String, String>,
}

impl ManualOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated `SYMBOL:id` list, e.g. `"BTC:bitcoin, PEPE:pepe"`.
    ///
    /// Entries without a colon are ignored, as are entries with an empty side
    /// or more than one colon.
    pub fn parse(input: &str) -> Self {
        let mut entries = BTreeMap::new();
        for item in input.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let Some((symbol, id)) = item.split_once(':') else {
                continue;
            };
            let (symbol, id) = (symbol.trim(), id.trim());
            if symbol.is_empty() || id.is_empty() || id.contains(':') {
                warn!("Ignoring malformed manual override '{}'", item);
                continue;
            }
            entries.insert(symbol.to_uppercase(), id.to_string());
        }
        Self { entries }
    }

    pub fn insert(&mut self, symbol: &str, canonical_id: impl Into<String>) {
        self.entries
            .insert(symbol.trim().to_uppercase(), canonical_id.into());
    }

    pub fn get(&self, symbol_upper: &str) -> Option<&str> {
        self.entries.get(symbol_upper).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolver for ManualOverrides {
    fn name(&self) -> &'static str {
        "manual_override"
    }

    fn resolve(&self, query: &SymbolQuery) -> Option<ResolutionResult> {
        let id = self.get(&query.upper)?;
        Some(ResolutionResult::from_override(
            query.raw.clone(),
            id,
            None,
            ResolutionSource::ManualOverride,
        ))
    }
}
