//! Override table maintenance CLI.
//!
//! Usage:
//!   coinlink-refresh generate --limit 2000 --per-page 100 --output overrides.json
//!   coinlink-refresh update --targets-file targets.txt --current overrides.json \
//!     --output overrides.json
//!
//! `COINLINK_CG_API_KEY` switches both commands to the pro API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coinlink_market_data::mapping::{
    build_override_table, dedup_targets, fetch_top_coins, refresh_mapping, ListingConfig,
    DEFAULT_TARGET_SYMBOLS,
};
use coinlink_market_data::resolver::write_ordered_table;
use coinlink_market_data::{CoinGeckoProvider, OverrideTable};

#[derive(Parser, Debug)]
#[command(name = "coinlink-refresh")]
#[command(about = "Build and refresh coinlink override tables")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a table from the top coins by market cap
    Generate {
        /// Total number of coins to fetch
        #[arg(long, default_value_t = 2000)]
        limit: usize,

        /// Coins per page
        #[arg(long, default_value_t = 100)]
        per_page: u32,

        /// Seconds to wait between pages
        #[arg(long, default_value_t = 5)]
        page_delay: u64,

        /// Seconds to wait after a rate-limited page
        #[arg(long, default_value_t = 30)]
        rate_limit_delay: u64,

        /// Output JSON file
        #[arg(long, short = 'o', default_value = "overrides.json")]
        output: PathBuf,
    },

    /// Re-match target symbols and merge with the current table
    Update {
        /// Target symbols, one per line or comma separated (default: built-in list)
        #[arg(long, short = 't')]
        targets_file: Option<PathBuf>,

        /// Current table to merge with
        #[arg(long, short = 'c')]
        current: Option<PathBuf>,

        /// Output JSON file
        #[arg(long, short = 'o', default_value = "overrides.json")]
        output: PathBuf,

        /// Timeout per provider call, in seconds
        #[arg(long, default_value_t = 60)]
        fetch_timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let api_key = std::env::var("COINLINK_CG_API_KEY").ok();
    let provider = CoinGeckoProvider::new(api_key);

    match args.command {
        Command::Generate {
            limit,
            per_page,
            page_delay,
            rate_limit_delay,
            output,
        } => {
            let config = ListingConfig {
                limit,
                per_page,
                page_delay: Duration::from_secs(page_delay),
                rate_limit_delay: Duration::from_secs(rate_limit_delay),
                ..ListingConfig::default()
            };
            info!("Fetching top {} coins by market cap", config.limit);
            let coins = fetch_top_coins(&provider, &config).await;
            if coins.is_empty() {
                bail!("Failed to fetch any market data");
            }
            info!("Fetched {} coins", coins.len());

            let table = build_override_table(&coins);
            table
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("Wrote {} entries to {}", table.len(), output.display());
        }
        Command::Update {
            targets_file,
            current,
            output,
            fetch_timeout,
        } => {
            let targets = match &targets_file {
                Some(path) => read_targets(path)?,
                None => dedup_targets(DEFAULT_TARGET_SYMBOLS),
            };
            let current_table = load_current(current.as_deref())?;
            info!(
                "Refreshing {} targets against {} current entries",
                targets.len(),
                current_table.len()
            );

            let outcome = refresh_mapping(
                &provider,
                &provider,
                &targets,
                &current_table,
                Duration::from_secs(fetch_timeout),
            )
            .await?;

            write_ordered_table(&output, &outcome.entries)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(
                "Update complete! Total symbols: {}, Missing IDs: {}",
                outcome.entries.len(),
                outcome.missing.len()
            );
            if !outcome.missing.is_empty() {
                warn!("Symbols that might need manual review:");
                for symbol in &outcome.missing {
                    warn!("- {}", symbol);
                }
            }
        }
    }

    Ok(())
}

/// One symbol per line or comma separated; `#` starts a comment.
fn read_targets(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading targets from {}", path.display()))?;
    Ok(parse_targets(&content))
}

fn parse_targets(content: &str) -> Vec<String> {
    dedup_targets(
        content
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default())
            .flat_map(|line| line.split(',')),
    )
}

fn load_current(path: Option<&Path>) -> anyhow::Result<OverrideTable> {
    match path {
        Some(path) if path.exists() => Ok(OverrideTable::load(path)?),
        Some(path) => {
            warn!("{} does not exist, starting from an empty table", path.display());
            Ok(OverrideTable::empty())
        }
        None => Ok(OverrideTable::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let targets = parse_targets("BTC, ETH\n# comment\n kPEPE # trailing\n\nBTC\n");
        assert_eq!(targets, vec!["BTC", "ETH", "kPEPE"]);
    }

    #[test]
    fn test_load_current_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_current(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_current_reads_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current.json");
        std::fs::write(&path, r#"{"BTC": "bitcoin", "NIL": "MISSING_ID"}"#).unwrap();

        let table = load_current(Some(path.as_path())).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("BTC"), Some("bitcoin"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["coinlink-refresh", "generate", "--limit", "50"]);
        match args.command {
            Command::Generate { limit, per_page, .. } => {
                assert_eq!(limit, 50);
                assert_eq!(per_page, 100);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
