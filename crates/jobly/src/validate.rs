//! Field validation for create payloads.
//!
//! Errors are collected rather than returned on the first failure so the caller
//! can report every offending field at once.

use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Len,
    Range,
    Email,
    Url,
    Lowercase,
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Len => "len",
            Self::Range => "range",
            Self::Email => "email",
            Self::Url => "url",
            Self::Lowercase => "lowercase",
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// Convenience for `push(ValidationError::new(..))`.
    pub fn add(&mut self, field: &str, code: ValidationCode, message: impl Into<String>) {
        self.push(ValidationError::new(field, code, message));
    }

    /// Returns `Err(self)` when any error was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Best-effort email validation.
///
/// This is intentionally not fully RFC-compliant.
pub fn is_email(s: &str) -> bool {
    static EMAIL_RE: OnceLock<regex::Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid built-in email regex")
        })
        .is_match(s)
}

pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Checks `1 <= chars <= max` and records a `len` error otherwise.
pub(crate) fn check_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let n = value.chars().count();
    if n == 0 {
        errors.add(field, ValidationCode::Required, format!("{field} is required"));
    } else if n > max {
        errors.add(
            field,
            ValidationCode::Len,
            format!("{field} must be at most {max} characters"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_simple_addresses() {
        assert!(is_email("user1@user.com"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("a b@c.d"));
    }

    #[test]
    fn url_requires_scheme() {
        assert!(is_url("http://c1.img"));
        assert!(!is_url("c1.img"));
    }

    #[test]
    fn check_len_reports_empty_and_long() {
        let mut errors = ValidationErrors::default();
        check_len(&mut errors, "handle", "", 25);
        check_len(&mut errors, "name", &"x".repeat(30), 25);
        check_len(&mut errors, "title", "ok", 25);

        let codes: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.code.as_str())).collect();
        assert_eq!(codes, vec![("handle", "required"), ("name", "len")]);
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::default();
        errors.add("salary", ValidationCode::Range, "salary must be >= 0");
        errors.add("email", ValidationCode::Email, "invalid email");
        assert_eq!(errors.to_string(), "salary: salary must be >= 0; email: invalid email");
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::default().into_result().is_ok());
    }
}
