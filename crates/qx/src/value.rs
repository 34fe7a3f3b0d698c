//! Literal values and named bindings.
//!
//! [`Value`] is the closed set of things that can be rendered as a SQL literal.
//! Conversions from Rust types happen at the API boundary through `From`, so the
//! quoting code can match exhaustively instead of sniffing types at render time.
//!
//! [`Bindings`] is an insertion-ordered name → value map. It serves both as the
//! placeholder bindings for [`interpolate`](crate::interpolate()) and as the column
//! map accepted by `where_`, `set`, `values` and friends.

use crate::tree::Tree;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A literal value that can be quoted into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Renders as `NULL`.
    Null,
    /// Renders as `'t'` or `'f'`.
    Bool(bool),
    /// Renders unquoted as decimal text.
    Int(i64),
    /// Renders as dollar-quoted decimal text.
    Float(f64),
    /// Renders dollar-quoted.
    Text(String),
    /// Renders single-quoted in UTC.
    Timestamp(DateTime<Utc>),
    /// A finalized sub-select, rendered as its compiled text.
    Query(Arc<Tree>),
    /// Each element quoted and joined with `, `.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_uint {
    ($($ty:ty),*) => {
        $(
            /// Values above `i64::MAX` are kept exact as numeric text.
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
                }
            }
        )*
    };
}

impl_from_wide_uint!(u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Tree> for Value {
    fn from(v: Tree) -> Self {
        Value::Query(Arc::new(v))
    }
}

impl From<Arc<Tree>> for Value {
    fn from(v: Arc<Tree>) -> Self {
        Value::Query(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::List(v.iter().cloned().map(Into::into).collect())
    }
}

/// An insertion-ordered map from names to values.
///
/// Binding the same name twice replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    entries: Vec<(String, Value)>,
}

/// Column maps use the same representation as placeholder bindings.
pub type ColumnMap = Bindings;

impl Bindings {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value` (chainable).
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` to `value` in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a bound value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries re-ordered by name.
    pub(crate) fn into_sorted(mut self) -> Vec<(String, Value)> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Bindings::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Bindings {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Build [`Bindings`] from `name: value` pairs.
///
/// ```ignore
/// let b = qx::bindings! { status: "active", ids: vec![1, 2, 3] };
/// ```
#[macro_export]
macro_rules! bindings {
    ($($name:ident : $value:expr),* $(,)?) => {
        $crate::Bindings::new()$(.bind(stringify!($name), $value))*
    };
}
