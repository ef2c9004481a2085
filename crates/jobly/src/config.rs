//! Database configuration loaded from the environment.
//!
//! `.env` files are honoured via `dotenvy`. Recognized variables:
//!
//! | variable | default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `JOBLY_POOL_MAX_SIZE` | 16 |
//! | `JOBLY_SLOW_QUERY_MS` | 500 |
//! | `JOBLY_SQL_LOG_MAX_LEN` | 200 |

use crate::error::{JoblyError, JoblyResult};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub pool_max_size: usize,
    pub slow_query_threshold: Duration,
    pub sql_log_max_len: usize,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max_size: 16,
            slow_query_threshold: Duration::from_millis(500),
            sql_log_max_len: 200,
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> JoblyResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| JoblyError::Config("DATABASE_URL is not set".to_string()))?;

        let mut config = Self::new(database_url);
        if let Some(n) = parse_var::<usize>(&lookup, "JOBLY_POOL_MAX_SIZE")? {
            config.pool_max_size = n;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "JOBLY_SLOW_QUERY_MS")? {
            config.slow_query_threshold = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<usize>(&lookup, "JOBLY_SQL_LOG_MAX_LEN")? {
            config.sql_log_max_len = n;
        }
        Ok(config)
    }

    pub fn with_pool_max_size(mut self, n: usize) -> Self {
        self.pool_max_size = n;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }

    pub fn with_sql_log_max_len(mut self, n: usize) -> Self {
        self.sql_log_max_len = n;
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> JoblyResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| JoblyError::Config(format!("{key} is not a valid number: {raw:?}"))),
    }
}
