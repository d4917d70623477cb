//! Environment-driven configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::pricing::Currency;

pub const DEFAULT_RATES_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Postgres URL; tours are not looked up when unset
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub rates_api_url: String,
    pub rates_base: Currency,
    pub rates_timeout: Duration,
    /// Price with the fixed fallback table and never call the rate API
    pub rates_offline: bool,
    /// JSON tariff replacing the built-in one
    pub tariff_path: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the environment (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_or("PORT", "5000").parse().context("Invalid PORT")?;
        let listen_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", "5")
            .parse()
            .context("Invalid DB_MAX_CONNECTIONS")?;
        let timeout_secs: u64 = env_or("RATES_TIMEOUT_SECS", "5")
            .parse()
            .context("Invalid RATES_TIMEOUT_SECS")?;

        Ok(Self {
            listen_addr,
            database_url: env_opt("DATABASE_URL"),
            db_max_connections,
            rates_api_url: env_or("RATES_API_URL", DEFAULT_RATES_API_URL),
            rates_base: Currency::parse(&env_or("RATES_BASE", "USD")),
            rates_timeout: Duration::from_secs(timeout_secs),
            rates_offline: matches!(
                env_or("RATES_OFFLINE", "false").to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
            tariff_path: env_opt("TARIFF_PATH").map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: None,
            db_max_connections: 5,
            rates_api_url: DEFAULT_RATES_API_URL.to_string(),
            rates_base: Currency::Usd,
            rates_timeout: Duration::from_secs(5),
            rates_offline: false,
            tariff_path: None,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
