//! Runtime configuration from the environment (and `.env`).

use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "VOCAB_DB_PATH";
pub const RESET_HOUR_VAR: &str = "VOCAB_DAILY_RESET_HOUR";
pub const LOG_VAR: &str = "RUST_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{RESET_HOUR_VAR} must be an hour between 0 and 23, got {0:?}")]
    InvalidResetHour(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Hour of day (0-23) when a new study day begins.
    pub daily_reset_hour: u32,
    pub log_filter: String,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = lookup(DB_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let daily_reset_hour = match lookup(RESET_HOUR_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|h| *h < 24)
                .ok_or_else(|| ConfigError::InvalidResetHour(raw.clone()))?,
            None => 0,
        };

        let log_filter = lookup(LOG_VAR).unwrap_or_else(|| "info".into());

        Ok(Self {
            db_path,
            daily_reset_hour,
            log_filter,
        })
    }
}

fn default_db_path() -> PathBuf {
    // Use app data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-srs")
        .join("vocab.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.daily_reset_hour, 0);
        assert_eq!(config.log_filter, "info");
        assert!(config.db_path.ends_with("vocab-srs/vocab.db"));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            (DB_PATH_VAR, "/tmp/cards.db"),
            (RESET_HOUR_VAR, " 4 "),
            (LOG_VAR, "vocab_cli=debug"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/cards.db"));
        assert_eq!(config.daily_reset_hour, 4);
        assert_eq!(config.log_filter, "vocab_cli=debug");
    }

    #[test]
    fn rejects_out_of_range_reset_hour() {
        assert_eq!(
            config_from(&[(RESET_HOUR_VAR, "24")]),
            Err(ConfigError::InvalidResetHour("24".to_string()))
        );
        assert!(config_from(&[(RESET_HOUR_VAR, "late")]).is_err());
    }
}
