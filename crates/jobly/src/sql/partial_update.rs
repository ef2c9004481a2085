use crate::error::{JoblyError, JoblyResult};
use crate::ident::{escape_ident, quote_ident};
use crate::value::FieldValue;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tokio_postgres::types::ToSql;

/// Sparse set of fields to change, in the order the caller supplied them.
///
/// Keys are unique: inserting an existing key replaces its value in place, so
/// the key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Chainable [`FieldMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// First key not contained in `allowed`, if any.
    pub fn first_unknown_key(&self, allowed: &[&str]) -> Option<&str> {
        self.keys().find(|k| !allowed.contains(k))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of scalar field values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
        let mut map = FieldMap::new();
        while let Some((k, v)) = access.next_entry::<String, FieldValue>()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Logical field name to physical column name lookup.
///
/// Fields without an entry are used verbatim as the column name.
pub trait ColumnNames {
    fn column_for(&self, field: &str) -> Option<&str>;
}

impl ColumnNames for [(&str, &str)] {
    fn column_for(&self, field: &str) -> Option<&str> {
        self.iter().find(|(f, _)| *f == field).map(|(_, c)| *c)
    }
}

impl<const N: usize> ColumnNames for [(&str, &str); N] {
    fn column_for(&self, field: &str) -> Option<&str> {
        self.as_slice().column_for(field)
    }
}

impl ColumnNames for HashMap<String, String> {
    fn column_for(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl ColumnNames for BTreeMap<String, String> {
    fn column_for(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

/// A translation table with no entries.
pub const NO_TRANSLATION: &[(&str, &str)] = &[];

/// One `column = $param` pair of a SET clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Physical column name (unquoted).
    pub column: String,
    /// 1-based placeholder index.
    pub param: usize,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=${}", escape_ident(&self.column), self.param)
    }
}

/// Output of [`sql_for_partial_update`]: position-synchronized assignments and values.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub assignments: Vec<Assignment>,
    pub values: Vec<FieldValue>,
}

impl PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2`
    pub fn set_clause(&self) -> String {
        self.assignments
            .iter()
            .map(Assignment::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Placeholder index for the first parameter appended after the SET values.
    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }

    /// Values as parameter refs, in placeholder order.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// Turn a sparse field map into SET-clause assignments and bound values.
///
/// `{firstName: "Aliya", age: 32}` with `[("firstName", "first_name")]` gives
/// `"first_name"=$1, "age"=$2` and `["Aliya", 32]`.
///
/// Fails with [`JoblyError::InvalidInput`] when `data` is empty or a resolved
/// column name is empty.
pub fn sql_for_partial_update<T>(data: &FieldMap, columns: &T) -> JoblyResult<PartialUpdate>
where
    T: ColumnNames + ?Sized,
{
    if data.is_empty() {
        return Err(JoblyError::invalid_input("no data to update"));
    }

    let mut assignments = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (field, value)) in data.iter().enumerate() {
        let column = columns.column_for(field).unwrap_or(field);
        quote_ident(column)?;
        assignments.push(Assignment {
            column: column.to_string(),
            param: idx + 1,
        });
        values.push(value.clone());
    }

    Ok(PartialUpdate {
        assignments,
        values,
    })
}
