//! Job listing filter: title substring, minimum salary, equity flag.

use super::{Criterion, FilterSpec, Predicate, lower_bound, present, present_text};
use crate::error::JoblyResult;
use crate::value::FieldValue;
use serde::Deserialize;

/// Raw job search parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearch {
    pub title: Option<String>,
    pub min_salary: Option<FieldValue>,
    pub has_equity: Option<FieldValue>,
}

impl JobSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, value: impl Into<FieldValue>) -> Self {
        self.min_salary = Some(value.into());
        self
    }

    pub fn has_equity(mut self, value: impl Into<FieldValue>) -> Self {
        self.has_equity = Some(value.into());
        self
    }
}

impl FilterSpec for JobSearch {
    type Filter = Predicate;

    /// Conditions are emitted in the order title, minSalary, hasEquity.
    ///
    /// `hasEquity` only ever adds `equity > 0`; a false flag adds nothing.
    /// A minimum salary that coerces to zero adds nothing either. Negative
    /// minimums are passed through.
    fn compose(&self) -> JoblyResult<Option<Predicate>> {
        let mut criteria = Vec::with_capacity(3);

        if let Some(title) = present_text(self.title.as_deref()) {
            criteria.push(Criterion::Contains {
                column: "title",
                needle: title.to_string(),
            });
        }
        if let Some(min) = present(self.min_salary.as_ref()) {
            let value = lower_bound("minSalary", min)?;
            if value != 0 {
                criteria.push(Criterion::AtLeast {
                    column: "salary",
                    value,
                });
            }
        }
        if self.has_equity.as_ref().is_some_and(FieldValue::coerce_flag) {
            criteria.push(Criterion::Positive { column: "equity" });
        }

        if criteria.is_empty() {
            tracing::trace!(target: "jobly.filter", "job search: no filter, default listing");
            return Ok(None);
        }
        tracing::trace!(
            target: "jobly.filter",
            criteria = criteria.len(),
            "job search: filtered listing"
        );
        Ok(Some(Predicate::new(criteria)))
    }
}
