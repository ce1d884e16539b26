/// config.rs — Centralised configuration loaded from .env
///
/// Loading happens once at startup; the CLI borrows &AppConfig for the rest
/// of the run.
use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::models::TimeFrame;

pub const DEFAULT_STORE_FILE: &str = "journal.json";
pub const DEFAULT_CURRENCY: &str = "$";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the persisted journal store
    pub store_path: PathBuf,
    /// Time frame used when the CLI is not given one
    pub default_time_frame: TimeFrame,
    /// Currency prefix for rendered amounts
    pub currency: String,
}

impl AppConfig {
    /// Load configuration from environment variables (after dotenv).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // ignore missing .env

        let store_path = env::var("JOURNAL_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_FILE));

        Ok(Self {
            store_path,
            default_time_frame: parse_env("DEFAULT_TIMEFRAME", TimeFrame::All)?,
            currency: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| DEFAULT_CURRENCY.into()),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            default_time_frame: TimeFrame::All,
            currency: DEFAULT_CURRENCY.into(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Config key {key}: {e}")),
        Err(_) => Ok(default),
    }
}
