//! Environment-based configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use stockroom_infra::{PersistenceConfig, StorageKeys};
use stockroom_observability::LogFormat;

pub const ENV_DB_PATH: &str = "STOCKROOM_DB_PATH";
pub const ENV_DEBOUNCE_MS: &str = "STOCKROOM_SAVE_DEBOUNCE_MS";
pub const ENV_ITEMS_KEY: &str = "STOCKROOM_ITEMS_KEY";
pub const ENV_TX_KEY: &str = "STOCKROOM_TX_KEY";
pub const ENV_DURABLE: &str = "STOCKROOM_DURABLE";
pub const ENV_LOG_FORMAT: &str = "STOCKROOM_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub persistence: PersistenceConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Invalid values fall back to
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = PersistenceConfig::default();

        let db_path = match lookup(ENV_DB_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let debounce = match lookup(ENV_DEBOUNCE_MS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %raw, "{ENV_DEBOUNCE_MS} is not a number; using default");
                    defaults.debounce
                }
            },
            None => defaults.debounce,
        };

        let durable = match lookup(ENV_DURABLE) {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    tracing::warn!(value = %raw, "{ENV_DURABLE} is not a boolean; using default");
                    defaults.durable
                }
            },
            None => defaults.durable,
        };

        let keys = StorageKeys {
            items: non_blank(lookup(ENV_ITEMS_KEY)).unwrap_or(defaults.keys.items),
            transactions: non_blank(lookup(ENV_TX_KEY)).unwrap_or(defaults.keys.transactions),
        };

        let log_format = lookup(ENV_LOG_FORMAT)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            db_path,
            persistence: PersistenceConfig {
                keys,
                debounce,
                durable,
            },
            log_format,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `{app_data_dir}/stockroom/stockroom.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    dir.push("stockroom");
    dir.push("stockroom.db");
    Ok(dir)
}
