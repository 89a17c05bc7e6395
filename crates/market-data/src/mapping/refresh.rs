//! Refresh of a curated mapping for a fixed list of target symbols.
//!
//! Uses the older tiered matcher rather than the scored resolver: each target
//! walks four tiers of symbol comparison and the first tier with any match
//! decides, highest market cap first.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::MarketDataError;
use crate::models::{CatalogEntry, MarketWeights};
use crate::provider::{CatalogProvider, MarketWeightProvider};
use crate::resolver::{fetch_weights_chunked, normalize_symbol, OverrideTable, MISSING_ID};

/// Symbols tracked by the refresh job when no targets file is given.
pub const DEFAULT_TARGET_SYMBOLS: &[&str] = &[
    "BTC", "ETH", "XRP", "BNB", "SOL", "DOGE", "ADA", "TRX", "LINK", "TON", "AVAX", "XLM", "SUI",
    "HBAR", "LTC", "DOT", "BCH", "UNI", "kPEPE", "APT", "NEAR", "ONDO", "MNT", "AAVE", "ETC", "ENA",
    "TAO", "TIA", "ATOM", "RNDR", "RENDER", "KAS", "FIL", "ALGO", "ARB", "OP", "FET", "MKR", "IMX",
    "STX", "kBONK", "SEI", "INJ", "LDO", "GALA", "CRV", "SAND", "IOTA", "BSV", "CAKE", "kFLOKI",
    "PYTH", "ENS", "FARTCOIN", "NEO", "AR", "STRK", "CFX", "PENDLE", "RSR", "RUNE", "APE", "GRASS",
    "MATIC", "COMP", "BRETT", "MORPHO", "ZRO", "MINA", "SNX", "KAITO", "ZETA", "EIGEN", "BLUR",
    "SUPER", "DYDX", "POPCAT", "STG", "CELO", "AI16Z", "FXS", "ORDI", "GAS", "TURBO", "RLB",
    "POLYX", "GMT", "GMX", "POL", "IO", "SUSHI", "ALT", "UMA", "MANTA", "ILV", "ANIME", "BOME",
    "USUAL", "AIXBT", "BIGTIME", "BLAST", "PEOPLE", "DYM", "YGG", "ORBS", "REQ", "STRAX", "TRB",
    "USTC", "XAI", "TNSR", "ARK", "CYBER", "BNT", "OGN", "GRIFFAIN", "MOODENG", "MAV", "ZEREBRO",
    "LISTA", "BADGER", "RDNT", "CATI", "PIXEL", "LOOM", "VINE", "MAVIA", "MYRO", "JELLY", "BLZ",
    "OX", "PANDORA", "CANTO", "UNIBOT", "FRIEND", "OMNI", "BANANA", "ZK", "PURR", "JUP", "WLD",
    "PNUT", "SCR", "S", "FTM", "HPOS", "kSHIB", "SHIA", "FTT", "MEME", "ZEN", "NFTI", "kLUNC", "JTO",
    "NTRN", "ACE", "WIF", "W", "AI", "ETHFI", "SAGA", "MERL", "REZ", "NOT", "MEW", "kDOGS", "HMSTR",
    "NEIROETH", "kNEIRO", "GOAT", "CHILLGUY", "HYPE", "ME", "MOVE", "VIRTUAL", "PENGU", "BIO", "SPX",
    "TRUMP", "MELANIA", "VVV", "BERA", "TST", "LAYER", "IP", "OM", "NIL",
];

/// Fixed answers applied before matching, for targets the matcher gets wrong.
pub const REFRESH_MANUAL_OVERRIDES: &[(&str, &str)] = &[("kPEPE", "pepe")];

/// Normalized symbols must be longer than this for substring matching.
const SUBSTRING_MIN_LEN: usize = 3;

/// Result of a refresh run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// `(symbol, id)` for every target, resolved first then missing, each alphabetical
    pub entries: Vec<(String, String)>,
    /// Targets that ended up as [`MISSING_ID`], alphabetical
    pub missing: Vec<String>,
}

/// Entries of the first tier with any match for `symbol`, in catalog order.
pub fn matching_tier<'a>(symbol: &str, coins: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
    let normalized = normalize_symbol(symbol);
    let upper = symbol.to_uppercase();

    let tiers: [&dyn Fn(&CatalogEntry) -> bool; 4] = [
        &|coin: &CatalogEntry| coin.symbol.to_uppercase() == normalized,
        &|coin: &CatalogEntry| coin.symbol.to_uppercase() == upper,
        &|coin: &CatalogEntry| normalize_symbol(&coin.symbol) == normalized,
        &|coin: &CatalogEntry| {
            normalized.chars().count() > SUBSTRING_MIN_LEN
                && coin.symbol.to_uppercase().contains(normalized.as_str())
        },
    ];

    tiers
        .iter()
        .map(|tier| coins.iter().filter(|coin| tier(*coin)).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Best entry for `symbol`: highest weight within the first matching tier,
/// the earliest entry on ties.
pub fn find_best_match<'a>(
    symbol: &str,
    coins: &'a [CatalogEntry],
    weights: &MarketWeights,
) -> Option<&'a CatalogEntry> {
    let found = matching_tier(symbol, coins);
    if found.len() > 1 {
        debug!("Multiple matches for {}: {}", symbol, found.len());
    }

    found.into_iter().fold(None, |best, coin| match best {
        Some(b) if weights.get(&coin.canonical_id) <= weights.get(&b.canonical_id) => Some(b),
        _ => Some(coin),
    })
}

/// New mappings for `targets`: refresh overrides first, then the matcher.
/// Unmatched targets are absent from the result.
pub fn build_refreshed_mapping(
    targets: &[String],
    coins: &[CatalogEntry],
    weights: &MarketWeights,
) -> Vec<(String, String)> {
    let mut mapped = Vec::with_capacity(targets.len());
    for target in targets {
        let manual = REFRESH_MANUAL_OVERRIDES
            .iter()
            .find(|(symbol, _)| *symbol == target.as_str());
        if let Some((_, id)) = manual {
            debug!("Applied manual override: {} -> {}", target, id);
            mapped.push((target.clone(), id.to_string()));
            continue;
        }
        match find_best_match(target, coins, weights) {
            Some(coin) => {
                debug!("Matched {} -> {}", target, coin.canonical_id);
                mapped.push((target.clone(), coin.canonical_id.clone()));
            }
            None => warn!("No match found for {}", target),
        }
    }
    mapped
}

/// Merge new mappings with the current table: new, else current, else
/// [`MISSING_ID`]. Only targets are kept.
pub fn merge_mappings(
    targets: &[String],
    fresh: &[(String, String)],
    current: &OverrideTable,
) -> RefreshOutcome {
    let mut entries: Vec<(String, String)> = targets
        .iter()
        .map(|target| {
            let id = fresh
                .iter()
                .find(|(symbol, _)| symbol == target)
                .map(|(_, id)| id.as_str())
                .or_else(|| current.get(&target.to_uppercase()))
                .unwrap_or(MISSING_ID);
            (target.clone(), id.to_string())
        })
        .collect();

    entries.sort_by(|a, b| (a.1 == MISSING_ID, &a.0).cmp(&(b.1 == MISSING_ID, &b.0)));

    let missing = entries
        .iter()
        .filter(|(_, id)| id == MISSING_ID)
        .map(|(symbol, _)| symbol.clone())
        .collect();

    RefreshOutcome { entries, missing }
}

/// Deduplicate targets, keeping first-seen order and dropping blanks.
pub fn dedup_targets<I, S>(targets: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Full refresh: fetch the catalog, weigh the matching tiers, match, merge.
///
/// A catalog failure aborts the refresh. Weight failures only lower the
/// quality of tie-breaking.
pub async fn refresh_mapping(
    catalog: &dyn CatalogProvider,
    weights: &dyn MarketWeightProvider,
    targets: &[String],
    current: &OverrideTable,
    fetch_timeout: Duration,
) -> Result<RefreshOutcome, MarketDataError> {
    let snapshot = timeout(fetch_timeout, catalog.fetch_catalog())
        .await
        .map_err(|_| MarketDataError::Timeout {
            provider: catalog.id().to_string(),
        })??;
    info!("Fetched {} coins for refresh", snapshot.len());

    let coins = snapshot.entries();
    let ids: Vec<String> = targets
        .iter()
        .flat_map(|target| matching_tier(target, coins))
        .map(|coin| coin.canonical_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let market_weights = fetch_weights_chunked(weights, &ids, fetch_timeout, None).await;
    info!("Fetched market data for {} coins", market_weights.len());

    let fresh = build_refreshed_mapping(targets, coins, &market_weights);
    let outcome = merge_mappings(targets, &fresh, current);

    info!(
        "Refresh complete: {} symbols, {} missing",
        outcome.entries.len(),
        outcome.missing.len()
    );
    Ok(outcome)
}
