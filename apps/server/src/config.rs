use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{ensure, Context};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cg_api_key: Option<String>,
    pub overrides_path: Option<PathBuf>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub fetch_timeout: Duration,
    pub batch_deadline: Duration,
    pub static_dir: String,
    pub trace_symbols: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("COINLINK_LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("Invalid COINLINK_LISTEN_ADDR")?;
        let cg_api_key = std::env::var("COINLINK_CG_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let overrides_path = std::env::var("COINLINK_OVERRIDES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let cors_allow = split_list(
            &std::env::var("COINLINK_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let request_timeout_ms = env_millis("COINLINK_REQUEST_TIMEOUT_MS", 30_000);
        let fetch_timeout_ms = env_millis("COINLINK_FETCH_TIMEOUT_MS", 20_000);
        let batch_deadline_ms = env_millis("COINLINK_BATCH_DEADLINE_MS", 25_000);
        let static_dir = std::env::var("COINLINK_STATIC_DIR").unwrap_or_else(|_| "static".into());
        let trace_symbols = split_list(&std::env::var("COINLINK_TRACE_SYMBOLS").unwrap_or_default());

        let config = Self {
            listen_addr,
            cg_api_key,
            overrides_path,
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            batch_deadline: Duration::from_millis(batch_deadline_ms),
            static_dir,
            trace_symbols,
        };
        config.validate()?;
        Ok(config)
    }

    /// The request timeout must outlast the resolver's batch deadline, or a
    /// slow provider turns `/generate` into a timeout instead of degraded rows.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.request_timeout > self.batch_deadline,
            "COINLINK_REQUEST_TIMEOUT_MS ({:?}) must be larger than COINLINK_BATCH_DEADLINE_MS ({:?})",
            self.request_timeout,
            self.batch_deadline
        );
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cg_api_key: None,
            overrides_path: None,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(20),
            batch_deadline: Duration::from_secs(25),
            static_dir: "static".to_string(),
            trace_symbols: Vec::new(),
        }
    }
}

fn env_millis(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" https://a.example, ,https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_default_matches_env_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        assert_eq!(config.fetch_timeout, Duration::from_millis(20_000));
        assert_eq!(config.batch_deadline, Duration::from_millis(25_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_must_outlast_batch_deadline() {
        let config = Config {
            request_timeout: Duration::from_secs(20),
            batch_deadline: Duration::from_secs(20),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
