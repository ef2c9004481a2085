//! # jobly
//!
//! Company, job and user persistence for the Jobly job board on PostgreSQL.
//!
//! ## Features
//!
//! - **Partial updates**: [`sql_for_partial_update`] turns a sparse field map into
//!   a `SET` clause with positional parameters
//! - **Listing filters**: [`CompanySearch`] and [`JobSearch`] compose loosely typed
//!   query parameters into bound `WHERE` conditions
//! - **Models**: CRUD for companies, jobs and users over any [`GenericClient`]
//! - **Access policy**: [`auth::authorize`] maps a [`Principal`] and an [`Action`]
//!   to allow or deny
//! - **Logging**: [`LoggingClient`] traces every statement under `jobly.sql`
//!
//! ```ignore
//! use jobly::{CompanySearch, DbConfig, LoggingClient, create_pool, models::company};
//!
//! let config = DbConfig::from_env()?;
//! let pool = create_pool(&config)?;
//! let client = LoggingClient::from_config(pool.get().await?, &config);
//!
//! let search = CompanySearch::new().name("net").min_employees(10);
//! let listing = company::find_all(&client, Some(&search)).await?;
//! ```

pub mod auth;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod filter;
pub mod ident;
pub mod logging;
pub mod models;
pub mod row;
pub mod sql;
pub mod validate;
pub mod value;

#[cfg(feature = "migrate")]
pub mod migrate;
#[cfg(feature = "pool")]
pub mod pool;

pub use auth::{Action, PasswordHasher, Principal, authorize};
pub use client::GenericClient;
pub use condition::{Condition, Op};
pub use config::DbConfig;
pub use error::{JoblyError, JoblyResult};
pub use filter::{
    CompanyFilter, CompanyProjection, CompanySearch, Criterion, FilterSpec, JobSearch, Predicate,
};
pub use ident::{Ident, IntoIdent, quote_ident};
pub use logging::{LoggingClient, StatementKind};
pub use row::{FromRow, RowExt};
pub use sql::{
    ColumnNames, FieldMap, NO_TRANSLATION, PartialUpdate, Sql, sql, sql_for_partial_update,
};
pub use validate::{ValidationCode, ValidationError, ValidationErrors};
pub use value::FieldValue;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
