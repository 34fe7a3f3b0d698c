//! INSERT value sets.

use crate::error::{QxError, QxResult};
use crate::quote::{quote_ident, quote_literal};
use crate::value::{Bindings, Value};

/// The three shapes `values()` accepts.
///
/// ```ignore
/// // parallel columns and rows
/// Values::rows(["a", "b"], vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]]);
/// // one map per row; columns are the sorted keys of the first map
/// Values::maps(vec![bindings! { b: 2, a: 1 }, bindings! { a: 3, b: 4 }]);
/// // a single row
/// Values::map(bindings! { a: 1, b: 2 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Maps(Vec<Bindings>),
    Map(Bindings),
}

/// Quoted columns and rows of quoted literals.
pub(crate) type NormalizedValues = (Vec<String>, Vec<Vec<String>>);

impl Values {
    pub fn rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Values::Rows {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    pub fn maps(maps: Vec<Bindings>) -> Self {
        Values::Maps(maps)
    }

    pub fn map(map: impl Into<Bindings>) -> Self {
        Values::Map(map.into())
    }

    /// Quote every column and literal, checking that all rows line up.
    pub(crate) fn normalize(self) -> QxResult<NormalizedValues> {
        let (columns, rows) = match self {
            Values::Rows { columns, rows } => {
                if columns.is_empty() {
                    return Err(QxError::malformed("values() needs at least one column"));
                }
                if rows.is_empty() {
                    return Err(QxError::malformed("values() needs at least one row"));
                }
                if let Some((i, row)) = rows
                    .iter()
                    .enumerate()
                    .find(|(_, row)| row.len() != columns.len())
                {
                    return Err(QxError::malformed(format!(
                        "values() row {i} has {} values for {} columns",
                        row.len(),
                        columns.len()
                    )));
                }
                (columns, rows)
            }
            Values::Maps(maps) => {
                let mut sorted = maps.into_iter().map(Bindings::into_sorted);
                let Some(first) = sorted.next() else {
                    return Err(QxError::malformed("values() needs at least one row"));
                };
                if first.is_empty() {
                    return Err(QxError::malformed("values() needs at least one column"));
                }
                let columns: Vec<String> = first.iter().map(|(k, _)| k.clone()).collect();
                let mut rows = vec![first.into_iter().map(|(_, v)| v).collect::<Vec<_>>()];
                for (i, entries) in sorted.enumerate() {
                    let same_keys = entries.len() == columns.len()
                        && entries.iter().zip(&columns).all(|((k, _), c)| k == c);
                    if !same_keys {
                        return Err(QxError::malformed(format!(
                            "values() row {} has different columns than the first row",
                            i + 1
                        )));
                    }
                    rows.push(entries.into_iter().map(|(_, v)| v).collect());
                }
                (columns, rows)
            }
            Values::Map(map) => {
                if map.is_empty() {
                    return Err(QxError::malformed("values() needs at least one column"));
                }
                let (columns, row): (Vec<String>, Vec<Value>) = map.into_entries().into_iter().unzip();
                (columns, vec![row])
            }
        };

        let columns: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(quote_literal).collect())
            .collect();
        Ok((columns, rows))
    }
}

impl From<Bindings> for Values {
    fn from(map: Bindings) -> Self {
        Values::Map(map)
    }
}

impl From<Vec<Bindings>> for Values {
    fn from(maps: Vec<Bindings>) -> Self {
        Values::Maps(maps)
    }
}
