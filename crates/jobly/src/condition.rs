//! Query condition primitives for dynamic WHERE clauses.
//!
//! A [`Condition`] is a single `column <op> $n` comparison over a validated
//! identifier. Values are always bound, never interpolated.

use crate::error::JoblyResult;
use crate::ident::{Ident, IntoIdent};
use crate::sql::Sql;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// column = value
    Eq,
    /// column > value
    Gt,
    /// column >= value
    Gte,
    /// column <= value
    Lte,
    /// Case-insensitive LIKE (PostgreSQL ILIKE)
    Ilike,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Ilike => "ILIKE",
        }
    }
}

/// A query condition primitive used by builders.
#[derive(Debug, Clone)]
pub struct Condition {
    column: Ident,
    op: Op,
    value: Arc<dyn ToSql + Send + Sync>,
}

impl Condition {
    /// Create a new condition from a column identifier and operator.
    pub fn new<I, T>(column: I, op: Op, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Ok(Condition {
            column: column.into_ident()?,
            op,
            value: Arc::new(value),
        })
    }

    /// column = value
    pub fn eq<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Eq, value)
    }

    /// column > value
    pub fn gt<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gt, value)
    }

    /// column >= value
    pub fn gte<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gte, value)
    }

    /// column <= value
    pub fn lte<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lte, value)
    }

    /// column ILIKE pattern
    pub fn ilike<I, T>(column: I, pattern: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ilike, pattern)
    }

    pub fn column(&self) -> &Ident {
        &self.column
    }

    pub fn op(&self) -> Op {
        self.op
    }

    /// Build the SQL fragment starting after `param_idx`, advancing it.
    pub fn build(&self, param_idx: &mut usize) -> (String, &(dyn ToSql + Sync)) {
        *param_idx += 1;
        let sql = format!("{} {} ${}", self.column, self.op.as_sql(), *param_idx);
        (sql, &*self.value as &(dyn ToSql + Sync))
    }

    /// Append this condition into a [`Sql`] builder.
    pub fn append_to_sql(&self, sql: &mut Sql) {
        sql.push(self.column.as_str());
        sql.push(" ");
        sql.push(self.op.as_sql());
        sql.push(" ");
        sql.push_bind_value(self.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_advances_param_index() {
        let mut idx = 2;
        let cond = Condition::gte("salary", 30_i32).unwrap();
        let (sql, _param) = cond.build(&mut idx);
        assert_eq!(sql, "salary >= $3");
        assert_eq!(idx, 3);
    }

    #[test]
    fn rejects_bad_column() {
        assert!(Condition::eq("id; --", 1_i32).is_err());
    }

    #[test]
    fn appends_into_sql_builder() {
        let mut q = Sql::new("SELECT id FROM jobs WHERE ");
        q.push_condition(&Condition::ilike("title", "%j%".to_string()).unwrap());
        assert_eq!(q.to_sql(), "SELECT id FROM jobs WHERE title ILIKE $1");
        assert_eq!(q.params_ref().len(), 1);
    }
}
