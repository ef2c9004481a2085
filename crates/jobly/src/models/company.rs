//! Companies.

use super::job::JobSummary;
use super::{FieldKind, normalize_fields, reject_unknown_keys, update_returning};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{CompanyProjection, CompanySearch, FilterSpec};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldMap, Sql, sql_for_partial_update};
use crate::validate::{ValidationCode, ValidationErrors, check_len, is_url};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";
const LISTING_COLUMNS: &str = "handle, name, description, logo_url";

/// Update keys and their column names.
const UPDATE_COLUMNS: [(&str, &str); 2] = [("numEmployees", "num_employees"), ("logoUrl", "logo_url")];
const UPDATABLE: [&str; 4] = ["name", "description", "numEmployees", "logoUrl"];
const UPDATE_KINDS: [(&str, FieldKind); 4] = [
    ("name", FieldKind::Text),
    ("description", FieldKind::Text),
    ("numEmployees", FieldKind::OptionalInt),
    ("logoUrl", FieldKind::OptionalText),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company in a listing filtered by name only: no employee count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListItem {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
}

impl FromRow for CompanyListItem {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Result of [`find_all`]; the shape follows the filter's projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompanyListing {
    Listing(Vec<CompanyListItem>),
    ListingWithCount(Vec<Company>),
}

impl CompanyListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Listing(items) => items.len(),
            Self::ListingWithCount(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handles(&self) -> Vec<&str> {
        match self {
            Self::Listing(items) => items.iter().map(|c| c.handle.as_str()).collect(),
            Self::ListingWithCount(items) => items.iter().map(|c| c.handle.as_str()).collect(),
        }
    }
}

/// A company with the jobs it posted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_len(&mut errors, "handle", &self.handle, 25);
        if self.handle != self.handle.to_lowercase() {
            errors.add("handle", ValidationCode::Lowercase, "handle must be lowercase");
        }
        check_len(&mut errors, "name", &self.name, 255);
        if self.num_employees.is_some_and(|n| n < 0) {
            errors.add("numEmployees", ValidationCode::Range, "numEmployees must not be negative");
        }
        if let Some(url) = self.logo_url.as_deref() {
            if !is_url(url) {
                errors.add("logoUrl", ValidationCode::Url, "logoUrl must be a URL");
            }
        }
        errors.into_result()
    }
}

/// Insert a company. Fails with `BadRequest` when the handle is taken.
pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> JoblyResult<Company> {
    new.validate()?;

    let duplicate = conn
        .query_opt("SELECT handle FROM companies WHERE handle = $1", &[&new.handle])
        .await?;
    if duplicate.is_some() {
        tracing::info!(target: "jobly.model", handle = %new.handle, "duplicate company");
        return Err(JoblyError::bad_request(format!("Duplicate company: {}", new.handle)));
    }

    let sql = format!(
        "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    );
    let row = conn
        .query_one(
            &sql,
            &[
                &new.handle,
                &new.name,
                &new.description,
                &new.num_employees,
                &new.logo_url,
            ],
        )
        .await?;
    Company::from_row(&row)
}

/// All companies ordered by name, optionally filtered.
///
/// Without a filter (or with one that constrains nothing) every column is
/// returned. A name-only filter leaves the employee count out.
pub async fn find_all(
    conn: &impl GenericClient,
    search: Option<&CompanySearch>,
) -> JoblyResult<CompanyListing> {
    let filter = match search {
        Some(search) => search.compose()?,
        None => None,
    };

    let Some(filter) = filter else {
        tracing::debug!(target: "jobly.model", "listing all companies");
        let sql = Sql::new(format!("SELECT {COLUMNS} FROM companies ORDER BY name"));
        return Ok(CompanyListing::ListingWithCount(sql.fetch_all_as(conn).await?));
    };

    tracing::debug!(
        target: "jobly.model",
        criteria = filter.predicate.len(),
        "listing filtered companies"
    );
    let columns = match filter.projection {
        CompanyProjection::Listing => LISTING_COLUMNS,
        CompanyProjection::ListingWithCount => COLUMNS,
    };
    let mut sql = Sql::new(format!("SELECT {columns} FROM companies"));
    filter.predicate.append_where(&mut sql)?;
    sql.push(" ORDER BY name");

    Ok(match filter.projection {
        CompanyProjection::Listing => CompanyListing::Listing(sql.fetch_all_as(conn).await?),
        CompanyProjection::ListingWithCount => {
            CompanyListing::ListingWithCount(sql.fetch_all_as(conn).await?)
        }
    })
}

/// One company with its jobs.
pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
    let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
    let company = match conn.query_opt(&sql, &[&handle]).await? {
        Some(row) => Company::from_row(&row)?,
        None => return Err(no_company(handle)),
    };

    let rows = conn
        .query(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
            &[&handle],
        )
        .await?;
    let jobs = rows
        .iter()
        .map(JobSummary::from_row)
        .collect::<JoblyResult<Vec<_>>>()?;

    Ok(CompanyDetail { company, jobs })
}

/// Partial update. Keys: `name`, `description`, `numEmployees`, `logoUrl`.
pub async fn update(conn: &impl GenericClient, handle: &str, data: &FieldMap) -> JoblyResult<Company> {
    reject_unknown_keys(data, &UPDATABLE)?;
    let mut data = data.clone();
    normalize_fields(&mut data, &UPDATE_KINDS)?;
    if let Some(FieldValue::Int(n)) = data.get("numEmployees") {
        if *n < 0 {
            return Err(JoblyError::bad_request("numEmployees must not be negative"));
        }
    }

    let update = sql_for_partial_update(&data, &UPDATE_COLUMNS)?;
    let row = update_returning(conn, "companies", &update, "handle", &handle, COLUMNS).await?;
    match row {
        Some(row) => Company::from_row(&row),
        None => Err(no_company(handle)),
    }
}

pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
    let row = conn
        .query_opt("DELETE FROM companies WHERE handle = $1 RETURNING handle", &[&handle])
        .await?;
    match row {
        Some(_) => Ok(()),
        None => Err(no_company(handle)),
    }
}

fn no_company(handle: &str) -> JoblyError {
    tracing::debug!(target: "jobly.model", handle, "company not found");
    JoblyError::not_found(format!("No company: {handle}"))
}
