use std::sync::Arc;

use coinlink_market_data::{CoinGeckoProvider, CoinResolver, OverrideTable, ResolverConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub resolver: CoinResolver,
}

impl AppState {
    pub fn new(resolver: CoinResolver) -> Self {
        Self { resolver }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("COINLINK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;
    let static_overrides = match &config.overrides_path {
        Some(path) => OverrideTable::load(path)?,
        None => OverrideTable::builtin(),
    };
    tracing::info!("Static override table: {} entries", static_overrides.len());

    if config.cg_api_key.is_some() {
        tracing::info!("Using the CoinGecko pro API");
    }
    let provider = Arc::new(CoinGeckoProvider::new(config.cg_api_key.clone()));

    let resolver_config = ResolverConfig::default()
        .with_fetch_timeout(config.fetch_timeout)
        .with_batch_deadline(config.batch_deadline)
        .with_trace_symbols(&config.trace_symbols);
    let resolver = CoinResolver::new(provider.clone(), provider)
        .with_static_overrides(static_overrides)
        .with_config(resolver_config);

    Ok(Arc::new(AppState::new(resolver)))
}
