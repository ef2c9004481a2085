//! SQL identifier handling.
//!
//! Postgres cannot bind identifiers as parameters, so column names that end up
//! in generated SQL are either validated ([`Ident::parse`]) or quoted
//! ([`quote_ident`]).

use crate::error::{JoblyError, JoblyResult};
use std::fmt;

/// A bare SQL identifier matching `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate an unquoted identifier.
    pub fn parse(s: &str) -> JoblyResult<Self> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(JoblyError::invalid_input("Identifier cannot be empty"));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(JoblyError::invalid_input(format!(
                "Invalid identifier start character in '{s}'"
            )));
        }
        if !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            return Err(JoblyError::invalid_input(format!(
                "Invalid character in identifier '{s}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can be turned into a validated [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> JoblyResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(self)
    }
}

/// Render `name` as a double-quoted identifier, doubling embedded quotes.
///
/// Any name is accepted except an empty one or one containing NUL.
pub fn quote_ident(name: &str) -> JoblyResult<String> {
    if name.is_empty() {
        return Err(JoblyError::invalid_input("Column name cannot be empty"));
    }
    if name.contains('\0') {
        return Err(JoblyError::invalid_input(
            "Column name cannot contain NUL character",
        ));
    }
    Ok(escape_ident(name))
}

/// Quote without validating; callers must have checked the name already.
pub(crate) fn escape_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_names() {
        assert_eq!(Ident::parse("num_employees").unwrap().as_str(), "num_employees");
        assert_eq!(Ident::parse("_x1").unwrap().to_string(), "_x1");
    }

    #[test]
    fn parse_rejects_unsafe_names() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("1col").is_err());
        assert!(Ident::parse("name; drop table jobs").is_err());
        assert!(Ident::parse("public.jobs").is_err());
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("first_name").unwrap(), "\"first_name\"");
        assert_eq!(quote_ident("a\"b").unwrap(), "\"a\"\"b\"");
        assert!(quote_ident("").is_err());
        assert!(quote_ident("a\0b").is_err());
    }
}
