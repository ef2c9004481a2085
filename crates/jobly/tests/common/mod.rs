#![allow(dead_code)]

use jobly::{GenericClient, JoblyResult, PasswordHasher};
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// One statement as seen by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub sql: String,
    pub params: Vec<String>,
}

/// A client that records every statement and returns no rows.
#[derive(Debug, Default)]
pub struct RecordingClient {
    log: Mutex<Vec<Recorded>>,
    rows_affected: u64,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows_affected(rows_affected: u64) -> Self {
        Self {
            log: Mutex::default(),
            rows_affected,
        }
    }

    pub fn statements(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|r| r.sql).collect()
    }

    pub fn last(&self) -> Recorded {
        self.statements().pop().expect("no statement recorded")
    }

    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        self.log.lock().unwrap().push(Recorded {
            sql: sql.to_string(),
            params: params.iter().map(|p| format!("{p:?}")).collect(),
        });
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.record(sql, params);
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.record(sql, params);
        Ok(self.rows_affected)
    }
}

/// Reversible "hash" for tests: prefixes the password.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> JoblyResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> JoblyResult<bool> {
        Ok(hash.strip_prefix("hashed:") == Some(password))
    }
}
