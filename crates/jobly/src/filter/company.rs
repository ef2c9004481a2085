//! Company listing filter: name substring and employee-count bounds.

use super::{Criterion, FilterSpec, Predicate, lower_bound, present, present_text, upper_bound};
use crate::error::{JoblyError, JoblyResult};
use crate::value::FieldValue;
use serde::Deserialize;

/// Raw company search parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearch {
    pub name: Option<String>,
    pub min_employees: Option<FieldValue>,
    pub max_employees: Option<FieldValue>,
}

impl CompanySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn min_employees(mut self, value: impl Into<FieldValue>) -> Self {
        self.min_employees = Some(value.into());
        self
    }

    pub fn max_employees(mut self, value: impl Into<FieldValue>) -> Self {
        self.max_employees = Some(value.into());
        self
    }
}

/// Which columns a filtered company listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyProjection {
    /// `handle, name, description, logoUrl`
    Listing,
    /// `handle, name, description, numEmployees, logoUrl`
    ListingWithCount,
}

/// A composed company filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFilter {
    pub predicate: Predicate,
    pub projection: CompanyProjection,
}

impl FilterSpec for CompanySearch {
    type Filter = CompanyFilter;

    /// Conditions are emitted in the order name, minEmployees, maxEmployees.
    ///
    /// The employee count is only projected when one of its bounds was given.
    fn compose(&self) -> JoblyResult<Option<CompanyFilter>> {
        let name = present_text(self.name.as_deref());
        let min = present(self.min_employees.as_ref());
        let max = present(self.max_employees.as_ref());

        if name.is_none() && min.is_none() && max.is_none() {
            tracing::trace!(target: "jobly.filter", "company search: no filter, default listing");
            return Ok(None);
        }

        let mut criteria = Vec::with_capacity(3);
        if let Some(name) = name {
            criteria.push(Criterion::Contains {
                column: "name",
                needle: name.to_string(),
            });
        }
        if let Some(min) = min {
            if min.coerce_number().is_some_and(|n| n < 0.0) {
                return Err(JoblyError::invalid_filter(
                    "minEmployees",
                    format!("must not be negative: {}", min.describe()),
                ));
            }
            criteria.push(Criterion::AtLeast {
                column: "num_employees",
                value: lower_bound("minEmployees", min)?,
            });
        }
        if let Some(max) = max {
            criteria.push(Criterion::AtMost {
                column: "num_employees",
                value: upper_bound("maxEmployees", max)?,
            });
        }

        let projection = if min.is_some() || max.is_some() {
            CompanyProjection::ListingWithCount
        } else {
            CompanyProjection::Listing
        };

        tracing::trace!(
            target: "jobly.filter",
            criteria = criteria.len(),
            ?projection,
            "company search: filtered listing"
        );
        Ok(Some(CompanyFilter {
            predicate: Predicate::new(criteria),
            projection,
        }))
    }
}
