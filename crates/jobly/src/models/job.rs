//! Jobs.

use super::{FieldKind, normalize_fields, reject_unknown_keys, update_returning};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{FilterSpec, JobSearch};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldMap, NO_TRANSLATION, Sql, sql_for_partial_update};
use crate::validate::{ValidationCode, ValidationErrors, check_len};
use crate::value::FieldValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle";
const UPDATABLE: [&str; 3] = ["title", "salary", "equity"];
const UPDATE_KINDS: [(&str, FieldKind); 3] = [
    ("title", FieldKind::Text),
    ("salary", FieldKind::OptionalInt),
    ("equity", FieldKind::OptionalNumber),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_len(&mut errors, "title", &self.title, 255);
        if self.salary.is_some_and(|s| s < 0) {
            errors.add("salary", ValidationCode::Range, "salary must not be negative");
        }
        if self
            .equity
            .is_some_and(|e| e < Decimal::ZERO || e > Decimal::ONE)
        {
            errors.add("equity", ValidationCode::Range, "equity must be between 0 and 1");
        }
        check_len(&mut errors, "companyHandle", &self.company_handle, 25);
        errors.into_result()
    }
}

/// Insert a job; the id is assigned by the database.
///
/// Fails with `BadRequest` when the company does not exist.
pub async fn create(conn: &impl GenericClient, new: &NewJob) -> JoblyResult<Job> {
    new.validate()?;

    let company = conn
        .query_opt(
            "SELECT handle FROM companies WHERE handle = $1",
            &[&new.company_handle],
        )
        .await?;
    if company.is_none() {
        tracing::info!(target: "jobly.model", company = %new.company_handle, "job for unknown company");
        return Err(JoblyError::bad_request(format!(
            "Invalid company handle: {}",
            new.company_handle
        )));
    }

    let sql = format!(
        "INSERT INTO jobs (title, salary, equity, company_handle) \
         VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    );
    let row = conn
        .query_one(
            &sql,
            &[&new.title, &new.salary, &new.equity, &new.company_handle],
        )
        .await?;
    Job::from_row(&row)
}

/// All jobs ordered by salary, optionally filtered.
pub async fn find_all(conn: &impl GenericClient, search: Option<&JobSearch>) -> JoblyResult<Vec<Job>> {
    let predicate = match search {
        Some(search) => search.compose()?,
        None => None,
    };

    let mut sql = Sql::new(format!("SELECT {COLUMNS} FROM jobs"));
    match &predicate {
        Some(predicate) => {
            tracing::debug!(target: "jobly.model", criteria = predicate.len(), "listing filtered jobs");
            predicate.append_where(&mut sql)?;
        }
        None => tracing::debug!(target: "jobly.model", "listing all jobs"),
    }
    sql.push(" ORDER BY salary");
    sql.fetch_all_as(conn).await
}

pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
    let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
    match conn.query_opt(&sql, &[&id]).await? {
        Some(row) => Job::from_row(&row),
        None => Err(no_job(id)),
    }
}

/// Partial update of `title`, `salary` and `equity`.
///
/// The owning company and the id never change.
pub async fn update(conn: &impl GenericClient, id: i32, data: &FieldMap) -> JoblyResult<Job> {
    reject_unknown_keys(data, &UPDATABLE)?;
    let data = prepare_update(data)?;

    let update = sql_for_partial_update(&data, NO_TRANSLATION)?;
    match update_returning(conn, "jobs", &update, "id", &id, COLUMNS).await? {
        Some(row) => Job::from_row(&row),
        None => Err(no_job(id)),
    }
}

pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
    let row = conn
        .query_opt("DELETE FROM jobs WHERE id = $1 RETURNING id", &[&id])
        .await?;
    match row {
        Some(_) => Ok(()),
        None => Err(no_job(id)),
    }
}

/// Typed copy of the update values with salary and equity range-checked.
fn prepare_update(data: &FieldMap) -> JoblyResult<FieldMap> {
    let mut data = data.clone();
    normalize_fields(&mut data, &UPDATE_KINDS)?;

    if let Some(salary) = data.get("salary").and_then(FieldValue::coerce_number) {
        if salary < 0.0 {
            return Err(JoblyError::bad_request(format!("Invalid salary: {salary}")));
        }
    }
    if let Some(equity) = data.get("equity").and_then(FieldValue::coerce_number) {
        if !(0.0..=1.0).contains(&equity) {
            return Err(JoblyError::bad_request(format!("Invalid equity: {equity}")));
        }
    }
    Ok(data)
}

fn no_job(id: i32) -> JoblyError {
    tracing::debug!(target: "jobly.model", id, "job not found");
    JoblyError::not_found(format!("No job: {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_job() -> NewJob {
        NewJob {
            title: "new".into(),
            salary: Some(500),
            equity: Some(Decimal::from_str("0.5").unwrap()),
            company_handle: "c1".into(),
        }
    }

    #[test]
    fn validation_rules() {
        assert!(new_job().validate().is_ok());
        assert!(
            NewJob {
                salary: None,
                equity: None,
                ..new_job()
            }
            .validate()
            .is_ok()
        );

        let bad = NewJob {
            title: String::new(),
            salary: Some(-1),
            equity: Some(Decimal::from_str("1.5").unwrap()),
            ..new_job()
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.field != "companyHandle"));
    }

    #[test]
    fn update_value_checks() {
        assert!(prepare_update(&FieldMap::new().with("title", "x")).is_ok());
        assert!(prepare_update(&FieldMap::new().with("salary", FieldValue::Null)).is_ok());

        let err = prepare_update(&FieldMap::new().with("salary", -5)).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Invalid salary: -5");
        assert!(prepare_update(&FieldMap::new().with("equity", 2)).is_err());
        assert!(prepare_update(&FieldMap::new().with("salary", "lots")).is_err());
        assert!(prepare_update(&FieldMap::new().with("title", 3)).is_err());
    }

    #[test]
    fn numeric_text_is_converted_before_binding() {
        let data = FieldMap::new().with("equity", "0.25").with("salary", "500");
        let prepared = prepare_update(&data).unwrap();
        assert_eq!(prepared.get("equity"), Some(&FieldValue::Float(0.25)));
        assert_eq!(prepared.get("salary"), Some(&FieldValue::Int(500)));
        assert_eq!(prepared.keys().collect::<Vec<_>>(), ["equity", "salary"]);
    }

    #[test]
    fn serializes_camel_case() {
        let job = Job {
            id: 1,
            title: "j1".into(),
            salary: Some(100),
            equity: Some(Decimal::from_str("0.1").unwrap()),
            company_handle: "c1".into(),
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["companyHandle"], "c1");
        assert_eq!(json["equity"], "0.1");
    }
}
