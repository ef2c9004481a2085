//! Statement fragments.
//!
//! - [`sql_for_partial_update`] turns a sparse field map into the SET clause of an
//!   `UPDATE` plus its positional values.
//! - [`Sql`] composes statements without manually tracking placeholder indices.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{FieldMap, sql_for_partial_update};
//!
//! let data = FieldMap::new().with("numEmployees", 12).with("name", "C1");
//! let upd = sql_for_partial_update(&data, &[("numEmployees", "num_employees")])?;
//! assert_eq!(upd.set_clause(), r#""num_employees"=$1, "name"=$2"#);
//! ```

mod builder;
mod partial_update;


pub use builder::Sql;
pub use partial_update::{
    Assignment, ColumnNames, FieldMap, NO_TRANSLATION, PartialUpdate, sql_for_partial_update,
};

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}
