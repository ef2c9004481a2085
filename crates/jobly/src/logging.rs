//! SQL logging via `tracing`.
//!
//! [`LoggingClient`] wraps any [`GenericClient`] and emits events under the
//! `jobly.sql` target:
//!
//! - `debug` before execution: statement kind, SQL (truncated), parameter count
//! - `debug` after execution: elapsed time and row count
//! - `warn` when a statement exceeds the slow-query threshold
//! - `error` when the statement fails

use crate::client::GenericClient;
use crate::config::DbConfig;
use crate::error::JoblyResult;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Statement classification for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    pub fn from_sql(sql: &str) -> Self {
        let head: String = sql
            .trim_start()
            .chars()
            .take(6)
            .collect::<String>()
            .to_ascii_uppercase();
        match head.as_str() {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            _ => Self::Other,
        }
    }
}

/// Truncate `sql` to at most `max` bytes on a char boundary.
pub(crate) fn truncate_sql(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A client wrapper that logs every statement it executes.
#[derive(Debug, Clone)]
pub struct LoggingClient<C> {
    client: C,
    slow_query_threshold: Option<Duration>,
    max_sql_length: Option<usize>,
}

impl<C: GenericClient> LoggingClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            slow_query_threshold: Some(Duration::from_millis(500)),
            max_sql_length: Some(200),
        }
    }

    /// Take thresholds from a [`DbConfig`].
    pub fn from_config(client: C, config: &DbConfig) -> Self {
        Self {
            client,
            slow_query_threshold: Some(config.slow_query_threshold),
            max_sql_length: Some(config.sql_log_max_len),
        }
    }

    /// Warn about statements slower than `threshold`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn before(&self, sql: &str, params: usize) -> (StatementKind, Instant) {
        let kind = StatementKind::from_sql(sql);
        tracing::debug!(
            target: "jobly.sql",
            kind = ?kind,
            params,
            sql = %self.display_sql(sql),
            "executing"
        );
        (kind, Instant::now())
    }

    fn after<T>(&self, kind: StatementKind, sql: &str, start: Instant, result: &JoblyResult<T>, rows: impl FnOnce(&T) -> u64) {
        let elapsed = start.elapsed();
        match result {
            Ok(value) => {
                let rows = rows(value);
                tracing::debug!(target: "jobly.sql", kind = ?kind, rows, ?elapsed, "done");
                if self.slow_query_threshold.is_some_and(|t| elapsed > t) {
                    tracing::warn!(
                        target: "jobly.sql",
                        kind = ?kind,
                        ?elapsed,
                        sql = %self.display_sql(sql),
                        "slow query"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    target: "jobly.sql",
                    kind = ?kind,
                    ?elapsed,
                    error = %e,
                    sql = %self.display_sql(sql),
                    "query failed"
                );
            }
        }
    }
}

impl<C: GenericClient> GenericClient for LoggingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        let (kind, start) = self.before(sql, params.len());
        let result = self.client.query(sql, params).await;
        self.after(kind, sql, start, &result, |rows| rows.len() as u64);
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        let (kind, start) = self.before(sql, params.len());
        let result = self.client.execute(sql, params).await;
        self.after(kind, sql, start, &result, |n| *n);
        result
    }
}
