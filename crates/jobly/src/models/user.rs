//! Users and their job applications.

use super::{FieldKind, normalize_fields, reject_unknown_keys, update_returning};
use crate::auth::PasswordHasher;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldMap, Sql, sql_for_partial_update};
use crate::validate::{ValidationCode, ValidationErrors, check_len, is_email};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "username, first_name, last_name, email, is_admin";

const UPDATE_COLUMNS: [(&str, &str); 3] = [
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];
const UPDATABLE: [&str; 5] = ["firstName", "lastName", "password", "email", "isAdmin"];
const UPDATE_KINDS: [(&str, FieldKind); 5] = [
    ("firstName", FieldKind::Text),
    ("lastName", FieldKind::Text),
    ("password", FieldKind::Text),
    ("email", FieldKind::Text),
    ("isAdmin", FieldKind::Bool),
];

/// A user as exposed to callers; the password hash never leaves the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// A user with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_len(&mut errors, "username", &self.username, 25);
        check_password(&mut errors, &self.password);
        check_len(&mut errors, "firstName", &self.first_name, 25);
        check_len(&mut errors, "lastName", &self.last_name, 25);
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    let n = password.chars().count();
    if !(5..=20).contains(&n) {
        errors.add(
            "password",
            ValidationCode::Len,
            "password must be 5 to 20 characters",
        );
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.chars().count() > 60 {
        errors.add("email", ValidationCode::Len, "email must be at most 60 characters");
    } else if !is_email(email) {
        errors.add("email", ValidationCode::Email, "email is not valid");
    }
}

/// Insert a user with a hashed password.
///
/// Fails with `BadRequest` when the username is taken.
pub async fn register(
    conn: &impl GenericClient,
    new: &NewUser,
    hasher: &dyn PasswordHasher,
) -> JoblyResult<User> {
    new.validate()?;

    let duplicate = conn
        .query_opt("SELECT username FROM users WHERE username = $1", &[&new.username])
        .await?;
    if duplicate.is_some() {
        tracing::info!(target: "jobly.model", username = %new.username, "duplicate username");
        return Err(JoblyError::bad_request(format!(
            "Duplicate username: {}",
            new.username
        )));
    }

    let hashed = hasher.hash(&new.password)?;
    let sql = format!(
        "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
    );
    let row = conn
        .query_one(
            &sql,
            &[
                &new.username,
                &hashed,
                &new.first_name,
                &new.last_name,
                &new.email,
                &new.is_admin,
            ],
        )
        .await?;
    User::from_row(&row)
}

/// Check a username/password pair.
///
/// Unknown users and wrong passwords fail the same way.
pub async fn authenticate(
    conn: &impl GenericClient,
    username: &str,
    password: &str,
    hasher: &dyn PasswordHasher,
) -> JoblyResult<User> {
    let sql = format!("SELECT {COLUMNS}, password FROM users WHERE username = $1");
    if let Some(row) = conn.query_opt(&sql, &[&username]).await? {
        let hash: String = row.try_get_column("password")?;
        if hasher.verify(password, &hash)? {
            return User::from_row(&row);
        }
    }
    tracing::info!(target: "jobly.model", username, "authentication failed");
    Err(JoblyError::unauthorized("Invalid username/password"))
}

/// All users ordered by username.
pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<User>> {
    Sql::new(format!("SELECT {COLUMNS} FROM users ORDER BY username"))
        .fetch_all_as(conn)
        .await
}

pub async fn get(conn: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
    let user = match conn.query_opt(&sql, &[&username]).await? {
        Some(row) => User::from_row(&row)?,
        None => return Err(no_user(username)),
    };

    let rows = conn
        .query(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
            &[&username],
        )
        .await?;
    let jobs = rows
        .iter()
        .map(|row| row.try_get_column::<i32>("job_id"))
        .collect::<JoblyResult<Vec<_>>>()?;

    Ok(UserDetail { user, jobs })
}

/// Partial update. Keys: `firstName`, `lastName`, `password`, `email`, `isAdmin`.
///
/// A new password is hashed before it is stored.
pub async fn update(
    conn: &impl GenericClient,
    username: &str,
    data: &FieldMap,
    hasher: &dyn PasswordHasher,
) -> JoblyResult<User> {
    reject_unknown_keys(data, &UPDATABLE)?;

    let mut data = data.clone();
    normalize_fields(&mut data, &UPDATE_KINDS)?;
    if let Some(FieldValue::Text(password)) = data.get_mut("password") {
        let mut errors = ValidationErrors::default();
        check_password(&mut errors, password);
        errors.into_result()?;
        *password = hasher.hash(password)?;
    }
    if let Some(FieldValue::Text(email)) = data.get("email") {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, email);
        errors.into_result()?;
    }

    let update = sql_for_partial_update(&data, &UPDATE_COLUMNS)?;
    match update_returning(conn, "users", &update, "username", &username, COLUMNS).await? {
        Some(row) => User::from_row(&row),
        None => Err(no_user(username)),
    }
}

pub async fn remove(conn: &impl GenericClient, username: &str) -> JoblyResult<()> {
    let row = conn
        .query_opt(
            "DELETE FROM users WHERE username = $1 RETURNING username",
            &[&username],
        )
        .await?;
    match row {
        Some(_) => Ok(()),
        None => Err(no_user(username)),
    }
}

/// Record that `username` applied to `job_id`.
///
/// Unknown users or jobs are `NotFound`; applying twice is a `BadRequest`.
pub async fn apply_to_job(conn: &impl GenericClient, username: &str, job_id: i32) -> JoblyResult<()> {
    let job = conn
        .query_opt("SELECT id FROM jobs WHERE id = $1", &[&job_id])
        .await?;
    if job.is_none() {
        return Err(JoblyError::not_found(format!("No job: {job_id}")));
    }

    let user = conn
        .query_opt("SELECT username FROM users WHERE username = $1", &[&username])
        .await?;
    if user.is_none() {
        return Err(no_user(username));
    }

    let existing = conn
        .query_opt(
            "SELECT job_id FROM applications WHERE username = $1 AND job_id = $2",
            &[&username, &job_id],
        )
        .await?;
    if existing.is_some() {
        return Err(JoblyError::bad_request(format!(
            "Already applied: {username} to job {job_id}"
        )));
    }

    conn.execute(
        "INSERT INTO applications (username, job_id) VALUES ($1, $2)",
        &[&username, &job_id],
    )
    .await?;
    tracing::info!(target: "jobly.model", username, job_id, "application recorded");
    Ok(())
}

fn no_user(username: &str) -> JoblyError {
    tracing::debug!(target: "jobly.model", username, "user not found");
    JoblyError::not_found(format!("No user: {username}"))
}
