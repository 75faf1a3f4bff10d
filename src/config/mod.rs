//! Configuration module for the PMO backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Populate the initial projects, members and assignments on an empty database
    pub seed: bool,
    /// Upper bound on pooled SQLite connections
    pub max_connections: u32,
    /// Deadline applied to each member operation; `None` waits indefinitely
    pub op_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("PMO_DB_PATH")
            .unwrap_or_else(|_| "./data/pmo.sqlite".to_string())
            .into();

        let bind_addr = parse_var("PMO_BIND_ADDR", "127.0.0.1:7070")?;

        let log_level = env::var("PMO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed = parse_var("PMO_SEED", "false")?;

        let max_connections = parse_var("PMO_DB_MAX_CONNECTIONS", "5")?;

        let op_timeout = match env::var("PMO_OP_TIMEOUT_MS") {
            Ok(raw) => {
                let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    key: "PMO_OP_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
                Some(Duration::from_millis(millis))
            }
            Err(_) => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            seed,
            max_connections,
            op_timeout,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share the process environment, so they run in one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("PMO_DB_PATH");
        env::remove_var("PMO_BIND_ADDR");
        env::remove_var("PMO_LOG_LEVEL");
        env::remove_var("PMO_SEED");
        env::remove_var("PMO_DB_MAX_CONNECTIONS");
        env::remove_var("PMO_OP_TIMEOUT_MS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/pmo.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:7070");
        assert_eq!(config.log_level, "info");
        assert!(!config.seed);
        assert_eq!(config.max_connections, 5);
        assert!(config.op_timeout.is_none());

        env::set_var("PMO_OP_TIMEOUT_MS", "250");
        let config = Config::from_env().unwrap();
        assert_eq!(config.op_timeout, Some(Duration::from_millis(250)));

        env::set_var("PMO_OP_TIMEOUT_MS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PMO_OP_TIMEOUT_MS"));

        env::remove_var("PMO_OP_TIMEOUT_MS");
    }
}
