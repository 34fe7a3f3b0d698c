//! Result rows.

use crate::error::QxResult;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::sync::Arc;

/// One result row: text values keyed by column name, in column order.
///
/// Values are the server's text representation; SQL `NULL` is `None`.
/// Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Record {
    /// Build a record. Rows of one result set share their column list.
    pub fn new(columns: Arc<[String]>, values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Value of the first column named `name`. `None` if the column is absent or NULL.
    pub fn get(&self, name: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == name)?;
        self.values.get(idx)?.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn shares_columns(&self, names: &[&str]) -> bool {
        self.columns.len() == names.len() && self.columns.iter().zip(names).all(|(a, b)| a == b)
    }

    pub(crate) fn column_list(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }

    pub(crate) fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Result of [`execute`](crate::execute), shaped by [`RowFormat`](crate::RowFormat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Rows(Vec<Record>),
    Columns {
        header: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    },
}

impl Output {
    pub(crate) fn columns_from(records: Vec<Record>) -> Self {
        let header = records
            .first()
            .map(|r| r.columns().to_vec())
            .unwrap_or_default();
        let rows = records.into_iter().map(Record::into_values).collect();
        Output::Columns { header, rows }
    }

    /// Number of result rows.
    pub fn len(&self) -> usize {
        match self {
            Output::Rows(records) => records.len(),
            Output::Columns { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The records, if this output is in [`RowFormat::Rows`](crate::RowFormat::Rows).
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Output::Rows(records) => Some(records),
            Output::Columns { .. } => None,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> QxResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
