//! Entity models.
//!
//! Every function takes any [`GenericClient`](crate::GenericClient), so calls can
//! run on a plain connection, a pooled one, or inside a transaction. All values
//! reach the database as bound parameters.

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyListItem, CompanyListing, NewCompany};
pub use job::{Job, JobSummary, NewJob};
pub use user::{NewUser, User, UserDetail};

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::sql::{FieldMap, PartialUpdate};
use crate::value::FieldValue;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Reject update keys outside `allowed`.
pub(crate) fn reject_unknown_keys(data: &FieldMap, allowed: &[&str]) -> JoblyResult<()> {
    match data.first_unknown_key(allowed) {
        Some(key) => Err(JoblyError::bad_request(format!("Field not updatable: {key}"))),
        None => Ok(()),
    }
}

/// The kind of column an update key writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    OptionalText,
    /// Booleans, or the text `"true"` / `"false"`.
    Bool,
    /// An `INTEGER` column; numeric text is accepted when it is integral.
    OptionalInt,
    /// A `NUMERIC` column; numeric text is accepted.
    OptionalNumber,
}

impl FieldKind {
    fn normalize(self, key: &str, value: &FieldValue) -> JoblyResult<FieldValue> {
        let normalized = match (self, value) {
            (Self::OptionalText | Self::OptionalInt | Self::OptionalNumber, FieldValue::Null) => {
                Some(FieldValue::Null)
            }
            (Self::Text | Self::OptionalText, FieldValue::Text(_)) => Some(value.clone()),
            (Self::Bool, FieldValue::Bool(_)) => Some(value.clone()),
            (Self::Bool, FieldValue::Text(s)) => match s.as_str() {
                "true" => Some(FieldValue::Bool(true)),
                "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            (Self::OptionalInt, FieldValue::Int(_) | FieldValue::Float(_) | FieldValue::Text(_)) => value
                .coerce_number()
                .filter(|n| n.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(n))
                .map(|n| FieldValue::Int(n as i64)),
            (Self::OptionalNumber, FieldValue::Int(_)) => Some(value.clone()),
            (Self::OptionalNumber, FieldValue::Float(_) | FieldValue::Text(_)) => {
                value.coerce_number().map(FieldValue::Float)
            }
            _ => None,
        };
        normalized.ok_or_else(|| JoblyError::bad_request(format!("Invalid {key}: {}", value.describe())))
    }
}

/// Check every present key against its column kind and convert loose values
/// (numeric text, `"true"`) to the type the column binds.
pub(crate) fn normalize_fields(data: &mut FieldMap, kinds: &[(&str, FieldKind)]) -> JoblyResult<()> {
    for (key, kind) in kinds {
        if let Some(value) = data.get_mut(key) {
            *value = kind.normalize(key, value)?;
        }
    }
    Ok(())
}

/// `UPDATE {table} SET ... WHERE {key_column} = $n+1 RETURNING {returning}`.
///
/// The key is bound after the SET values.
pub(crate) async fn update_returning(
    conn: &impl GenericClient,
    table: &str,
    update: &PartialUpdate,
    key_column: &str,
    key: &(dyn ToSql + Sync),
    returning: &str,
) -> JoblyResult<Option<Row>> {
    let sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = ${} RETURNING {returning}",
        update.set_clause(),
        update.next_param()
    );
    let mut params = update.params_ref();
    params.push(key);
    conn.query_opt(&sql, &params).await
}
