use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One coin known to the catalog.
///
/// Deserializes directly from an item of CoinGecko's `/coins/list` response
/// (`{"id": "...", "symbol": "...", "name": "..."}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Ticker as listed by the catalog, in the catalog's casing (usually lowercase)
    pub symbol: String,

    /// Unique catalog id
    #[serde(rename = "id")]
    pub canonical_id: String,

    /// Human-readable name (e.g. "Bitcoin Cash", "Look-Bro")
    #[serde(rename = "name")]
    pub display_name: String,
}

impl CatalogEntry {
    pub fn new(
        symbol: impl Into<String>,
        canonical_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            canonical_id: canonical_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Point-in-time, immutable list of catalog entries.
///
/// Cloning is cheap; the entries are shared between concurrent batches.
#[derive(Clone, Debug)]
pub struct CatalogSnapshot {
    entries: Arc<[CatalogEntry]>,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Snapshot with no entries. Every unresolved symbol becomes "not found".
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl From<Vec<CatalogEntry>> for CatalogSnapshot {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}
