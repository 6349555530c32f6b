//! Service configuration.
//!
//! Values come from `PHARMADICES_*` environment variables (optionally via a
//! `.env` file). Anything missing or malformed falls back to a default.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication; auth is off when unset
    pub api_psk: Option<String>,
    /// SQLite database holding user state
    pub db_path: PathBuf,
    /// Tantivy index directory
    pub index_path: PathBuf,
    /// Medicines JSON dataset
    pub dataset_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How often the reminder task checks schedules
    pub reminder_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("PHARMADICES_API_PSK")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let db_path = env::var("PHARMADICES_DB_PATH")
            .unwrap_or_else(|_| "./data/pharmadices.sqlite".to_string())
            .into();

        let index_path = env::var("PHARMADICES_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let dataset_path = env::var("PHARMADICES_DATASET_PATH")
            .unwrap_or_else(|_| "./data/medicines.json".to_string())
            .into();

        let bind_addr = parse_or_default("PHARMADICES_BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let log_level = env::var("PHARMADICES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reminder_secs = parse_or_default(
            "PHARMADICES_REMINDER_INTERVAL_SECS",
            Some(DEFAULT_REMINDER_INTERVAL_SECS),
        )
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REMINDER_INTERVAL_SECS);

        Self {
            api_psk,
            db_path,
            index_path,
            dataset_path,
            bind_addr,
            log_level,
            reminder_interval: Duration::from_secs(reminder_secs),
        }
    }
}

/// Parse an env var, warning and returning `default` when it is malformed.
fn parse_or_default<T: std::str::FromStr>(key: &str, default: Option<T>) -> Option<T> {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}; using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        env::remove_var("PHARMADICES_API_PSK");
        env::remove_var("PHARMADICES_DB_PATH");
        env::remove_var("PHARMADICES_INDEX_PATH");
        env::remove_var("PHARMADICES_DATASET_PATH");
        env::remove_var("PHARMADICES_BIND_ADDR");
        env::remove_var("PHARMADICES_LOG_LEVEL");
        env::remove_var("PHARMADICES_REMINDER_INTERVAL_SECS");

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/pharmadices.sqlite"));
        assert_eq!(config.index_path, PathBuf::from("./data/index"));
        assert_eq!(config.dataset_path, PathBuf::from("./data/medicines.json"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.reminder_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_parse_or_default_rejects_garbage() {
        env::set_var("PHARMADICES_TEST_NUMBER", "sixty");
        assert_eq!(parse_or_default::<u64>("PHARMADICES_TEST_NUMBER", Some(5)), Some(5));
        env::set_var("PHARMADICES_TEST_NUMBER", "30");
        assert_eq!(parse_or_default::<u64>("PHARMADICES_TEST_NUMBER", Some(5)), Some(30));
        env::remove_var("PHARMADICES_TEST_NUMBER");
    }
}
