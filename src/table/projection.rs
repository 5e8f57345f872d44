/*!
 * Row Projection
 * Export of requested columns from a materialized row
 */

use super::columns::Column;
use crate::scan::Row;
use serde::{Deserialize, Serialize};

/// Exported column value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    UInt(u64),
    Text(String),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Set of requested columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadSet(u32);

impl ReadSet {
    #[inline]
    pub const fn all() -> Self {
        Self(u32::MAX)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn with(self, column: Column) -> Self {
        Self(self.0 | (1 << column.index()))
    }

    #[inline]
    pub const fn contains(self, column: Column) -> bool {
        self.0 & (1 << column.index()) != 0
    }

    pub fn columns(self) -> impl Iterator<Item = Column> {
        Column::all().filter(move |column| self.contains(*column))
    }
}

impl Default for ReadSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Column> for ReadSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Projected row, addressable by column index
///
/// Unrequested columns are `None`; requested columns without data are
/// `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedRow {
    values: Vec<Option<Value>>,
}

impl ProjectedRow {
    #[inline]
    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values[column.index()].as_ref()
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Requested columns with their names, in field order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| Some((Column::from_index(index)?.name(), value.as_ref()?)))
    }
}

/// Export the requested columns of a valid row
///
/// Returns `None` for invalid rows, which callers report as "no such row".
pub fn project(row: &Row, read_set: ReadSet) -> Option<ProjectedRow> {
    if !row.is_valid() {
        return None;
    }

    let mut values = vec![None; Column::COUNT];
    for column in read_set.columns() {
        values[column.index()] = Some(column_value(row, column));
    }
    Some(ProjectedRow { values })
}

fn column_value(row: &Row, column: Column) -> Value {
    match column {
        Column::SqlText => {
            let text = row.sql_text();
            if text.is_empty() {
                Value::Null
            } else {
                Value::Text(String::from_utf8_lossy(text).into_owned())
            }
        }
        column if column.is_unimplemented() => Value::Null,
        column => row
            .execute
            .value(column.index() - Column::FIRST_EXECUTE.index())
            .map_or(Value::Null, Value::UInt),
    }
}
