//! Error types for jobly

use crate::validate::ValidationErrors;
use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Errors surfaced by the fragment builders, the models and the storage seam.
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update was requested without any field to change.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A listing filter could not be turned into a condition.
    #[error("Invalid filter '{field}': {message}")]
    InvalidFilter { field: String, message: String },

    /// Request rejected by a model rule (duplicates, unknown references, bad fields)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The caller is not allowed to perform the action
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[cfg(feature = "migrate")]
    #[error("Migration error: {0}")]
    Migration(String),
}

impl JoblyError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid-filter error for a named filter field
    pub fn invalid_filter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// HTTP status the request-handling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidFilter { .. }
            | Self::BadRequest(_)
            | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().code() {
                "23505" => return Self::BadRequest(format!("Duplicate value ({constraint})")),
                "23503" => {
                    return Self::BadRequest(format!("Unknown reference ({constraint})"));
                }
                "23514" => return Self::BadRequest(format!("Check violated ({constraint})")),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<ValidationErrors> for JoblyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "migrate")]
impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}
