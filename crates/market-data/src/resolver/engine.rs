//! Batch resolution: overrides, then catalog matching and scoring.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{debug, info, info_span, warn};

use crate::errors::MarketDataError;
use crate::models::{CatalogSnapshot, MarketWeights, ResolutionResult};
use crate::provider::{CatalogProvider, MarketWeightProvider, MAX_IDS_PER_REQUEST};

use super::candidates::{generate_candidates, retain_exact_symbol, MatchCandidate};
use super::chain::OverrideChain;
use super::overrides::{ManualOverrides, OverrideTable};
use super::query::SymbolQuery;
use super::scorer::{score_candidates, select, ScoredCandidate, Selection};

/// Default bound on a single provider call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Default bound on all provider calls of one batch together.
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(25);

/// Tuning for [`CoinResolver`].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Bound on each catalog or market-weight call.
    pub fetch_timeout: Duration,
    /// Bound on the whole batch. Each provider call gets the smaller of
    /// `fetch_timeout` and the time left.
    pub batch_deadline: Duration,
    /// Uppercased symbols whose per-candidate scores are logged at `info`.
    pub trace_symbols: HashSet<String>,
}

impl ResolverConfig {
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_batch_deadline(mut self, batch_deadline: Duration) -> Self {
        self.batch_deadline = batch_deadline;
        self
    }

    pub fn with_trace_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trace_symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    fn is_traced(&self, query: &SymbolQuery) -> bool {
        self.trace_symbols.contains(&query.upper)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            batch_deadline: DEFAULT_BATCH_DEADLINE,
            trace_symbols: HashSet::new(),
        }
    }
}

/// Resolves batches of ticker symbols to canonical ids.
///
/// Each call to [`CoinResolver::resolve`]:
///
/// 1. answers what it can from the manual overrides, then the static table
/// 2. fetches the catalog once, if anything is left
/// 3. generates candidates once per distinct uppercased symbol
/// 4. fetches market weights for the surviving candidate ids, 250 per call
/// 5. scores, selects and applies the false-positive guard
///
/// Provider failures never fail the batch. A failed catalog reads as empty,
/// failed weight chunks read as zero. All provider calls of a batch share
/// [`ResolverConfig::batch_deadline`]; chunks that would start after it are
/// skipped.
pub struct CoinResolver {
    catalog: Arc<dyn CatalogProvider>,
    weights: Arc<dyn MarketWeightProvider>,
    static_overrides: Arc<OverrideTable>,
    config: ResolverConfig,
}

impl CoinResolver {
    /// Resolver with an empty static table and default config.
    pub fn new(catalog: Arc<dyn CatalogProvider>, weights: Arc<dyn MarketWeightProvider>) -> Self {
        Self {
            catalog,
            weights,
            static_overrides: Arc::new(OverrideTable::empty()),
            config: ResolverConfig::default(),
        }
    }

    pub fn with_static_overrides(mut self, table: OverrideTable) -> Self {
        self.static_overrides = Arc::new(table);
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn static_overrides(&self) -> &OverrideTable {
        &self.static_overrides
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every symbol. The output has one result per input, in input
    /// order, duplicates included.
    pub async fn resolve<S: AsRef<str>>(
        &self,
        symbols: &[S],
        manual: &ManualOverrides,
    ) -> Vec<ResolutionResult> {
        let deadline = Instant::now() + self.config.batch_deadline;
        let queries: Vec<SymbolQuery> = symbols
            .iter()
            .map(|s| SymbolQuery::new(s.as_ref()))
            .collect();

        let chain = OverrideChain::new()
            .with(manual)
            .with(self.static_overrides.as_ref());

        let overridden: Vec<Option<ResolutionResult>> = queries
            .iter()
            .map(|query| {
                if query.is_empty() {
                    Some(ResolutionResult::not_found(query.raw.clone()))
                } else {
                    chain.resolve(query)
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let mut pending: Vec<&SymbolQuery> = Vec::new();
        for (query, result) in queries.iter().zip(&overridden) {
            if result.is_none() && seen.insert(query.upper.as_str()) {
                pending.push(query);
            }
        }

        if pending.is_empty() {
            debug!("All {} symbols answered by overrides", queries.len());
            return finish(&queries, overridden, &HashMap::new());
        }

        info!(
            "Resolving {} symbols against the catalog ({} from overrides)",
            pending.len(),
            overridden.iter().filter(|r| r.is_some()).count()
        );

        let catalog = self.load_catalog(deadline).await;

        let candidates: Vec<(&SymbolQuery, Vec<MatchCandidate<'_>>)> = pending
            .iter()
            .map(|query| {
                let mut candidates = generate_candidates(query, catalog.entries());
                retain_exact_symbol(&mut candidates);
                (*query, candidates)
            })
            .collect();

        let ids: Vec<String> = candidates
            .iter()
            .flat_map(|(_, found)| found.iter().map(|c| c.entry.canonical_id.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let weights = if ids.is_empty() {
            MarketWeights::new()
        } else {
            fetch_weights_chunked(
                self.weights.as_ref(),
                &ids,
                self.config.fetch_timeout,
                Some(deadline),
            )
            .await
        };

        let selections: HashMap<&str, Selection<'_>> = candidates
            .iter()
            .map(|(query, found)| (query.upper.as_str(), self.score_symbol(query, found, &weights)))
            .collect();

        finish(&queries, overridden, &selections)
    }

    fn score_symbol<'a>(
        &self,
        query: &SymbolQuery,
        candidates: &[MatchCandidate<'a>],
        weights: &MarketWeights,
    ) -> Selection<'a> {
        let span = info_span!("resolve_symbol", symbol = %query.upper);
        let _enter = span.enter();

        let traced = self.config.is_traced(query);
        let scored = score_candidates(query, candidates, weights);
        for candidate in &scored {
            log_score(candidate, traced);
        }

        let selection = select(query, &scored);
        match &selection {
            Selection::NoCandidates => debug!("No candidates for '{}'", query.upper),
            Selection::Rejected(best) => info!(
                "Rejected likely false positive for '{}': {} ({}, score {:.2})",
                query.upper,
                best.candidate.entry.canonical_id,
                best.candidate.strategy,
                best.final_score
            ),
            Selection::Winner(best) => debug!(
                "Selected {} for '{}' via {} (score {:.2})",
                best.candidate.entry.canonical_id,
                query.upper,
                best.candidate.strategy,
                best.final_score
            ),
        }
        selection
    }

    async fn load_catalog(&self, deadline: Instant) -> CatalogSnapshot {
        let provider = self.catalog.id();
        let budget = call_budget(self.config.fetch_timeout, Some(deadline));
        let result = match timeout(budget, self.catalog.fetch_catalog()).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                provider: provider.to_string(),
            }),
        };

        match result {
            Ok(snapshot) => {
                info!(
                    "Loaded {} catalog entries from '{}' at {}",
                    snapshot.len(),
                    provider,
                    snapshot.fetched_at().to_rfc3339()
                );
                snapshot
            }
            Err(e) => {
                warn!(
                    "Catalog fetch from '{}' failed: {}, continuing with an empty catalog",
                    provider, e
                );
                CatalogSnapshot::empty()
            }
        }
    }
}

/// Time allowed for the next provider call.
fn call_budget(fetch_timeout: Duration, deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(deadline) => fetch_timeout.min(deadline.saturating_duration_since(Instant::now())),
        None => fetch_timeout,
    }
}

/// Fetch weights for `ids` in chunks of [`MAX_IDS_PER_REQUEST`].
///
/// A chunk that fails or times out is logged and skipped; its ids read as 0.
/// Once `deadline` has passed the remaining chunks are not requested.
pub async fn fetch_weights_chunked(
    provider: &dyn MarketWeightProvider,
    ids: &[String],
    fetch_timeout: Duration,
    deadline: Option<Instant>,
) -> MarketWeights {
    let mut weights = MarketWeights::new();
    let chunks = ids.len().div_ceil(MAX_IDS_PER_REQUEST);

    for (index, chunk) in ids.chunks(MAX_IDS_PER_REQUEST).enumerate() {
        let budget = call_budget(fetch_timeout, deadline);
        if budget.is_zero() {
            warn!(
                "Batch deadline reached, skipping market weight chunks {}-{} from '{}'",
                index + 1,
                chunks,
                provider.id()
            );
            break;
        }

        let result = match timeout(budget, provider.fetch_weights(chunk)).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                provider: provider.id().to_string(),
            }),
        };

        match result {
            Ok(batch) => {
                debug!(
                    "Fetched {} market weights (chunk {}/{})",
                    batch.len(),
                    index + 1,
                    chunks
                );
                weights.extend(batch);
            }
            Err(e) => warn!(
                "Market weight chunk {}/{} from '{}' failed: {}, treating as zero",
                index + 1,
                chunks,
                provider.id(),
                e
            ),
        }
    }

    weights
}

fn log_score(scored: &ScoredCandidate<'_>, traced: bool) {
    let entry = scored.candidate.entry;
    if traced {
        info!(
            id = %entry.canonical_id,
            symbol = %entry.symbol,
            strategy = %scored.candidate.strategy,
            market_weight = scored.market_weight,
            score = scored.final_score,
            "candidate"
        );
    } else {
        debug!(
            id = %entry.canonical_id,
            symbol = %entry.symbol,
            strategy = %scored.candidate.strategy,
            market_weight = scored.market_weight,
            score = scored.final_score,
            "candidate"
        );
    }
}

fn finish(
    queries: &[SymbolQuery],
    overridden: Vec<Option<ResolutionResult>>,
    selections: &HashMap<&str, Selection<'_>>,
) -> Vec<ResolutionResult> {
    queries
        .iter()
        .zip(overridden)
        .map(|(query, result)| {
            result.unwrap_or_else(|| match selections.get(query.upper.as_str()) {
                Some(selection) => selection.into_result(query),
                None => ResolutionResult::not_found(query.raw.clone()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, MatchStrategy, ResolutionSource, NOT_FOUND};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockCatalog {
        entries: Vec<CatalogEntry>,
        should_fail: bool,
        delay: Duration,
        call_count: AtomicUsize,
    }

    impl MockCatalog {
        fn new(entries: Vec<CatalogEntry>) -> Self {
            Self {
                entries,
                should_fail: false,
                delay: Duration::ZERO,
                call_count: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl CatalogProvider for MockCatalog {
        fn id(&self) -> &'static str {
            "MOCK_CATALOG"
        }

        async fn fetch_catalog(&self) -> Result<CatalogSnapshot, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.should_fail {
                return Err(MarketDataError::ProviderError {
                    provider: "MOCK_CATALOG".to_string(),
                    message: "Mock failure".to_string(),
                });
            }
            Ok(CatalogSnapshot::new(self.entries.clone()))
        }
    }

    struct MockWeights {
        values: HashMap<String, f64>,
        should_fail: bool,
        requests: Mutex<Vec<Vec<String>>>,
    }

    impl MockWeights {
        fn new(values: &[(&str, f64)]) -> Self {
            Self {
                values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                should_fail: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new(&[])
            }
        }

        fn requests(&self) -> Vec<Vec<String>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketWeightProvider for MockWeights {
        fn id(&self) -> &'static str {
            "MOCK_WEIGHTS"
        }

        async fn fetch_weights(&self, ids: &[String]) -> Result<MarketWeights, MarketDataError> {
            self.requests.lock().unwrap().push(ids.to_vec());
            if self.should_fail {
                return Err(MarketDataError::RateLimited {
                    provider: "MOCK_WEIGHTS".to_string(),
                });
            }
            Ok(ids
                .iter()
                .filter_map(|id| self.values.get(id).map(|w| (id.clone(), *w)))
                .collect())
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("btc", "batcat", "BatCat"),
            CatalogEntry::new("btc", "bitcoin", "Bitcoin"),
            CatalogEntry::new("eth", "ethereum", "Ethereum"),
            CatalogEntry::new("look", "look-bro", "Look-Bro"),
            CatalogEntry::new("opx", "op-network", "OP Network"),
        ]
    }

    fn weights() -> MockWeights {
        MockWeights::new(&[("bitcoin", 1.2e12), ("batcat", 10.0), ("ethereum", 4.0e11)])
    }

    fn resolver(catalog: &Arc<MockCatalog>, weights: &Arc<MockWeights>) -> CoinResolver {
        CoinResolver::new(catalog.clone(), weights.clone())
    }

    #[tokio::test]
    async fn test_results_preserve_order_and_duplicates() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights);

        let results = resolver
            .resolve(&["btc", "zzzz", "BTC", "  "], &ManualOverrides::new())
            .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].symbol, "btc");
        assert_eq!(results[0].canonical_id, "bitcoin");
        assert_eq!(
            results[0].reference_link,
            "https://www.coingecko.com/en/coins/bitcoin"
        );
        assert!(!results[0].is_fuzzy);
        assert_eq!(results[0].matched_symbol.as_deref(), Some("btc"));
        assert_eq!(results[0].strategy, Some(MatchStrategy::ExactSymbol));
        assert_eq!(results[0].source, ResolutionSource::Catalog);

        assert_eq!(results[1].symbol, "zzzz");
        assert_eq!(results[1].canonical_id, NOT_FOUND);

        assert_eq!(results[2].symbol, "BTC");
        assert_eq!(results[2].canonical_id, "bitcoin");

        assert_eq!(results[3].symbol, "");
        assert_eq!(results[3].canonical_id, NOT_FOUND);

        assert_eq!(catalog.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let results = resolver(&catalog, &weights)
            .resolve::<&str>(&[], &ManualOverrides::new())
            .await;
        assert!(results.is_empty());
        assert_eq!(catalog.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overrides_take_precedence() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights)
            .with_static_overrides(OverrideTable::from_pairs([("BTC", "batcat")]));
        let manual = ManualOverrides::parse("ETH:ethereum-wormhole");

        let results = resolver.resolve(&["btc", "eth", "look"], &manual).await;

        assert_eq!(results[0].canonical_id, "batcat");
        assert_eq!(results[0].source, ResolutionSource::StaticTable);
        assert_eq!(results[1].canonical_id, "ethereum-wormhole");
        assert_eq!(results[1].source, ResolutionSource::ManualOverride);
        assert_eq!(results[1].matched_symbol, None);
        assert!(!results[1].is_fuzzy);
        assert_eq!(results[2].canonical_id, "look-bro");
        assert_eq!(results[2].source, ResolutionSource::Catalog);
    }

    #[tokio::test]
    async fn test_no_provider_calls_when_fully_overridden() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights)
            .with_static_overrides(OverrideTable::from_pairs([("BTC", "bitcoin")]));
        let manual = ManualOverrides::parse("ETH:ethereum");

        let results = resolver.resolve(&["BTC", "eth", ""], &manual).await;

        assert_eq!(results.len(), 3);
        assert_eq!(catalog.call_count.load(Ordering::SeqCst), 0);
        assert!(weights.requests().is_empty());
    }

    #[tokio::test]
    async fn test_weights_requested_for_candidates_only() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        resolver(&catalog, &weights)
            .resolve(&["btc", "Btc"], &ManualOverrides::new())
            .await;

        assert_eq!(
            weights.requests(),
            vec![vec!["batcat".to_string(), "bitcoin".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_degrades_to_not_found() {
        let catalog = Arc::new(MockCatalog::failing());
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights)
            .with_static_overrides(OverrideTable::from_pairs([("ETH", "ethereum")]));

        let results = resolver
            .resolve(&["btc", "eth"], &ManualOverrides::new())
            .await;

        assert_eq!(results[0].canonical_id, NOT_FOUND);
        assert_eq!(results[0].source, ResolutionSource::Unresolved);
        assert_eq!(results[1].canonical_id, "ethereum");
        assert!(weights.requests().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_timeout_degrades_to_not_found() {
        let catalog = Arc::new(MockCatalog {
            delay: Duration::from_secs(5),
            ..MockCatalog::new(catalog())
        });
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights)
            .with_config(ResolverConfig::default().with_fetch_timeout(Duration::from_millis(20)));

        let results = resolver.resolve(&["btc"], &ManualOverrides::new()).await;
        assert_eq!(results[0].canonical_id, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_batch_deadline_bounds_catalog_wait() {
        let catalog = Arc::new(MockCatalog {
            delay: Duration::from_secs(5),
            ..MockCatalog::new(catalog())
        });
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights).with_config(
            ResolverConfig::default().with_batch_deadline(Duration::from_millis(30)),
        );

        let start = Instant::now();
        let results = resolver.resolve(&["btc"], &ManualOverrides::new()).await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(results[0].canonical_id, NOT_FOUND);
        assert!(weights.requests().is_empty());
    }

    #[tokio::test]
    async fn test_slow_weights_share_batch_deadline() {
        struct StalledWeights;

        #[async_trait]
        impl MarketWeightProvider for StalledWeights {
            fn id(&self) -> &'static str {
                "STALLED"
            }

            async fn fetch_weights(
                &self,
                _ids: &[String],
            ) -> Result<MarketWeights, MarketDataError> {
                std::future::pending().await
            }
        }

        let catalog = Arc::new(MockCatalog {
            delay: Duration::from_millis(40),
            ..MockCatalog::new(catalog())
        });
        let resolver = CoinResolver::new(catalog, Arc::new(StalledWeights)).with_config(
            ResolverConfig::default()
                .with_fetch_timeout(Duration::from_secs(20))
                .with_batch_deadline(Duration::from_millis(80)),
        );

        let start = Instant::now();
        let results = resolver
            .resolve(&["btc", "zzzz"], &ManualOverrides::new())
            .await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(results.len(), 2);
        // Zero weights, so the first exact match in catalog order wins.
        assert_eq!(results[0].canonical_id, "batcat");
        assert_eq!(results[1].canonical_id, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chunks_after_deadline_are_not_requested() {
        let weights = MockWeights::new(&[]);
        let ids: Vec<String> = (0..300).map(|i| format!("id-{:03}", i)).collect();

        let fetched = fetch_weights_chunked(
            &weights,
            &ids,
            Duration::from_secs(1),
            Some(Instant::now()),
        )
        .await;

        assert!(fetched.is_empty());
        assert!(weights.requests().is_empty());
    }

    #[tokio::test]
    async fn test_weight_failure_falls_back_to_catalog_order() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(MockWeights::failing());
        let results = resolver(&catalog, &weights)
            .resolve(&["btc"], &ManualOverrides::new())
            .await;

        // Equal scores, so the first exact match in catalog order wins.
        assert_eq!(results[0].canonical_id, "batcat");
        assert_eq!(results[0].score, Some(100.0));
    }

    #[tokio::test]
    async fn test_short_fuzzy_match_is_rejected() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let results = resolver(&catalog, &weights)
            .resolve(&["OP"], &ManualOverrides::new())
            .await;

        assert_eq!(results[0].canonical_id, NOT_FOUND);
        assert!(!results[0].is_fuzzy);
        assert_eq!(results[0].matched_symbol, None);
    }

    #[tokio::test]
    async fn test_fuzzy_match_is_flagged() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let results = resolver(&catalog, &weights)
            .resolve(&["LOOKBRO"], &ManualOverrides::new())
            .await;

        assert_eq!(results[0].canonical_id, "look-bro");
        assert!(results[0].is_fuzzy);
        assert_eq!(results[0].matched_symbol.as_deref(), Some("look"));
        assert_eq!(results[0].strategy, Some(MatchStrategy::IdIsHyphenatedTicker));
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let catalog = Arc::new(MockCatalog::new(catalog()));
        let weights = Arc::new(weights());
        let resolver = resolver(&catalog, &weights)
            .with_config(ResolverConfig::default().with_trace_symbols(["btc"]));
        let symbols = ["btc", "eth", "LOOKBRO", "OP", "nope"];

        let first = resolver.resolve(&symbols, &ManualOverrides::new()).await;
        let second = resolver.resolve(&symbols, &ManualOverrides::new()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_weights_fetched_in_chunks() {
        let entries: Vec<CatalogEntry> = (0..600)
            .map(|i| CatalogEntry::new("dup", format!("dup-{:03}", i), format!("Dup {}", i)))
            .collect();
        let catalog = Arc::new(MockCatalog::new(entries));
        let weights = Arc::new(MockWeights::new(&[("dup-599", 5.0e9)]));

        let results = resolver(&catalog, &weights)
            .resolve(&["DUP"], &ManualOverrides::new())
            .await;

        let sizes: Vec<usize> = weights.requests().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![250, 250, 100]);
        assert_eq!(results[0].canonical_id, "dup-599");
    }

    #[tokio::test]
    async fn test_failed_chunk_is_skipped() {
        struct FlakyWeights {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl MarketWeightProvider for FlakyWeights {
            fn id(&self) -> &'static str {
                "FLAKY"
            }

            async fn fetch_weights(
                &self,
                ids: &[String],
            ) -> Result<MarketWeights, MarketDataError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(MarketDataError::Timeout {
                        provider: "FLAKY".to_string(),
                    });
                }
                Ok(ids.iter().map(|id| (id.clone(), 100.0)).collect())
            }
        }

        let ids: Vec<String> = (0..300).map(|i| format!("id-{:03}", i)).collect();
        let provider = FlakyWeights {
            calls: AtomicUsize::new(0),
        };
        let weights = fetch_weights_chunked(&provider, &ids, Duration::from_secs(1), None).await;

        assert_eq!(weights.len(), 50);
        assert_eq!(weights.get("id-000"), 0.0);
        assert_eq!(weights.get("id-299"), 100.0);
    }
}
