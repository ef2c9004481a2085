//! Listing filters.
//!
//! Each entity's search parameters compose into a [`Predicate`]: an ordered list
//! of typed [`Criterion`]s joined with `AND`. Composition returns `None` when no
//! recognized filter is set, which callers treat as "use the unfiltered listing".
//!
//! Substring filters are matched case-insensitively (`ILIKE`) and the search text
//! is treated literally: `%`, `_` and `\` in it are escaped before binding.

pub mod company;
pub mod job;

use crate::condition::Condition;
use crate::error::{JoblyError, JoblyResult};
use crate::sql::Sql;
use crate::value::FieldValue;
use rust_decimal::Decimal;

pub use company::{CompanyFilter, CompanyProjection, CompanySearch};
pub use job::JobSearch;

/// Search parameters that can be composed into a filter.
pub trait FilterSpec {
    /// What a successful composition yields.
    type Filter;

    /// Build the filter, or `None` when nothing constrains the listing.
    fn compose(&self) -> JoblyResult<Option<Self::Filter>>;
}

/// One typed condition of a listing predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// `column ILIKE '%needle%'`, needle taken literally.
    Contains { column: &'static str, needle: String },
    /// `column >= value`
    AtLeast { column: &'static str, value: i32 },
    /// `column <= value`
    AtMost { column: &'static str, value: i32 },
    /// `column > 0`
    Positive { column: &'static str },
}

impl Criterion {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Contains { column, .. }
            | Self::AtLeast { column, .. }
            | Self::AtMost { column, .. }
            | Self::Positive { column } => column,
        }
    }

    /// Lower into a bound [`Condition`].
    pub fn to_condition(&self) -> JoblyResult<Condition> {
        match self {
            Self::Contains { column, needle } => Condition::ilike(*column, contains_pattern(needle)),
            Self::AtLeast { column, value } => Condition::gte(*column, *value),
            Self::AtMost { column, value } => Condition::lte(*column, *value),
            Self::Positive { column } => Condition::gt(*column, Decimal::ZERO),
        }
    }
}

/// AND-combined criteria, in composition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    criteria: Vec<Criterion>,
}

impl Predicate {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn conditions(&self) -> JoblyResult<Vec<Condition>> {
        self.criteria.iter().map(Criterion::to_condition).collect()
    }

    /// Append ` WHERE c1 AND c2 ...` to `sql`; no-op when empty.
    pub fn append_where(&self, sql: &mut Sql) -> JoblyResult<()> {
        let conditions = self.conditions()?;
        sql.push_where_and(&conditions);
        Ok(())
    }
}

/// Escape LIKE wildcards so `s` matches literally.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%escaped%` for substring containment.
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like(s))
}

/// The value, if it is present and truthy.
pub(crate) fn present(value: Option<&FieldValue>) -> Option<&FieldValue> {
    value.filter(|v| v.is_truthy())
}

/// Non-empty text filter.
pub(crate) fn present_text(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn number(field: &str, value: &FieldValue) -> JoblyResult<f64> {
    value.coerce_number().ok_or_else(|| {
        JoblyError::invalid_filter(field, format!("not a number: {}", value.describe()))
    })
}

fn to_i32(field: &str, n: f64) -> JoblyResult<i32> {
    if n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return Err(JoblyError::invalid_filter(field, format!("out of range: {n}")));
    }
    Ok(n as i32)
}

/// Inclusive lower bound over an integer column: fractional input rounds up.
pub(crate) fn lower_bound(field: &str, value: &FieldValue) -> JoblyResult<i32> {
    to_i32(field, number(field, value)?.ceil())
}

/// Inclusive upper bound over an integer column: fractional input rounds down.
pub(crate) fn upper_bound(field: &str, value: &FieldValue) -> JoblyResult<i32> {
    to_i32(field, number(field, value)?.floor())
}
