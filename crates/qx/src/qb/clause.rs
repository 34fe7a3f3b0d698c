//! Caller-facing clause inputs and their normalization to SQL text.

use crate::compile::compile_tree;
use crate::interpolate::interpolate;
use crate::quote::{quote_ident, write_ident, write_literal};
use crate::tree::{JoinClause, Tree};
use crate::value::{Bindings, Value};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// A table-like source: verbatim text or a finalized sub-select.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Text(String),
    Query(Arc<Tree>),
}

impl Source {
    /// Render as an identifier: text is quoted, a sub-select is spliced.
    pub(crate) fn to_ident(&self) -> String {
        match self {
            Source::Text(s) => quote_ident(s),
            Source::Query(tree) => splice(tree),
        }
    }

    /// Render verbatim: text as-is, a sub-select is spliced.
    pub(crate) fn to_raw(&self) -> String {
        match self {
            Source::Text(s) => s.clone(),
            Source::Query(tree) => splice(tree),
        }
    }
}

/// Quote a table-like source: a name is quoted as with
/// [`quote_ident`](crate::quote_ident), a finalized tree is compiled and returned
/// as-is.
///
/// ```ignore
/// assert_eq!(qx::quote_source("public.users"), r#""public"."users""#);
/// assert_eq!(qx::quote_source(tree), r#"SELECT id FROM "users""#);
/// ```
pub fn quote_source(source: impl Into<Source>) -> String {
    match source.into() {
        Source::Text(s) => quote_ident(&s),
        Source::Query(tree) => compile_tree(&tree),
    }
}

/// Aliased sub-selects already render as `(...) AS "x"`; bare ones get parentheses.
fn splice(tree: &Tree) -> String {
    let sql = compile_tree(tree);
    if tree.alias.is_some() {
        sql
    } else {
        format!("({sql})")
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Text(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Text(s)
    }
}

impl From<&String> for Source {
    fn from(s: &String) -> Self {
        Source::Text(s.clone())
    }
}

impl From<Tree> for Source {
    fn from(t: Tree) -> Self {
        Source::Query(Arc::new(t))
    }
}

impl From<Arc<Tree>> for Source {
    fn from(t: Arc<Tree>) -> Self {
        Source::Query(t)
    }
}

/// One WHERE/HAVING entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// A free-text fragment whose `$name` tokens are interpolated.
    Expr { sql: String, bindings: Bindings },
    /// `"col" IN (val)` for every entry, AND-joined.
    Map(Bindings),
}

impl Clause {
    pub fn expr(sql: impl Into<String>, bindings: Bindings) -> Self {
        Clause::Expr {
            sql: sql.into(),
            bindings,
        }
    }

    pub fn map(columns: impl Into<Bindings>) -> Self {
        Clause::Map(columns.into())
    }

    pub(crate) fn render(&self) -> String {
        match self {
            Clause::Expr { sql, bindings } => interpolate(sql, bindings),
            Clause::Map(columns) => {
                let mut out = String::new();
                for (i, (col, val)) in columns.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" AND ");
                    }
                    write_ident(&mut out, col);
                    out.push_str(" IN (");
                    write_literal(&mut out, val);
                    out.push(')');
                }
                out
            }
        }
    }
}

impl From<&str> for Clause {
    fn from(sql: &str) -> Self {
        Clause::expr(sql, Bindings::new())
    }
}

impl From<String> for Clause {
    fn from(sql: String) -> Self {
        Clause::expr(sql, Bindings::new())
    }
}

impl From<(&str, Bindings)> for Clause {
    fn from((sql, bindings): (&str, Bindings)) -> Self {
        Clause::expr(sql, bindings)
    }
}

impl From<(String, Bindings)> for Clause {
    fn from((sql, bindings): (String, Bindings)) -> Self {
        Clause::expr(sql, bindings)
    }
}

impl From<Bindings> for Clause {
    fn from(columns: Bindings) -> Self {
        Clause::Map(columns)
    }
}

/// One clause or several, as accepted by `where_`, `and_where`, `having` and `and_having`.
pub trait IntoClauses {
    fn into_clauses(self) -> Vec<Clause>;
}

macro_rules! impl_into_clauses_single {
    ($($ty:ty),*) => {
        $(
            impl IntoClauses for $ty {
                fn into_clauses(self) -> Vec<Clause> {
                    vec![Clause::from(self)]
                }
            }
        )*
    };
}

impl_into_clauses_single!(&str, String, (&str, Bindings), (String, Bindings), Bindings);

impl IntoClauses for Clause {
    fn into_clauses(self) -> Vec<Clause> {
        vec![self]
    }
}

impl IntoClauses for Vec<Clause> {
    fn into_clauses(self) -> Vec<Clause> {
        self
    }
}

impl<const N: usize> IntoClauses for [Clause; N] {
    fn into_clauses(self) -> Vec<Clause> {
        self.into_iter().collect()
    }
}

/// A `JOIN source ON condition` triplet (the bindings feed the condition).
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    source: Source,
    on: String,
    bindings: Bindings,
}

impl Join {
    pub fn new(source: impl Into<Source>, on: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            on: on.into(),
            bindings: Bindings::new(),
        }
    }

    /// Bindings for `$name` tokens in the ON condition.
    pub fn bind(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub(crate) fn render(&self) -> JoinClause {
        JoinClause {
            source: self.source.to_raw(),
            on: interpolate(&self.on, &self.bindings),
        }
    }
}

/// One join or several, as accepted by `join`, `add_join`, `left_join` and `add_left_join`.
pub trait IntoJoins {
    fn into_joins(self) -> Vec<Join>;
}

impl IntoJoins for Join {
    fn into_joins(self) -> Vec<Join> {
        vec![self]
    }
}

impl IntoJoins for Vec<Join> {
    fn into_joins(self) -> Vec<Join> {
        self
    }
}

impl<const N: usize> IntoJoins for [Join; N] {
    fn into_joins(self) -> Vec<Join> {
        self.into_iter().collect()
    }
}

impl<S: Into<Source>> IntoJoins for (S, &str) {
    fn into_joins(self) -> Vec<Join> {
        vec![Join::new(self.0, self.1)]
    }
}

impl<S: Into<Source>> IntoJoins for (S, &str, Bindings) {
    fn into_joins(self) -> Vec<Join> {
        vec![Join::new(self.0, self.1).bind(self.2)]
    }
}

/// An ORDER BY key with an optional, unvalidated direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    direction: Option<String>,
}

impl OrderBy {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: None,
        }
    }

    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// `(column, DIRECTION)` with the direction dropped unless it is on the allow-list.
    pub(crate) fn render(&self) -> (String, Option<String>) {
        let direction = self.direction.as_deref().and_then(sanitize_direction);
        (self.column.clone(), direction)
    }
}

impl From<&str> for OrderBy {
    fn from(column: &str) -> Self {
        OrderBy::new(column)
    }
}

impl From<String> for OrderBy {
    fn from(column: String) -> Self {
        OrderBy::new(column)
    }
}

impl From<(&str, &str)> for OrderBy {
    fn from((column, direction): (&str, &str)) -> Self {
        OrderBy::new(column).direction(direction)
    }
}

impl From<(String, String)> for OrderBy {
    fn from((column, direction): (String, String)) -> Self {
        OrderBy::new(column).direction(direction)
    }
}

impl From<(&str, Option<&str>)> for OrderBy {
    fn from((column, direction): (&str, Option<&str>)) -> Self {
        let order = OrderBy::new(column);
        match direction {
            Some(d) => order.direction(d),
            None => order,
        }
    }
}

fn direction_regex() -> &'static Regex {
    static DIRECTION_RE: OnceLock<Regex> = OnceLock::new();
    DIRECTION_RE.get_or_init(|| {
        Regex::new(r"(?i)^(asc|desc)( nulls (first|last))?$")
            .expect("invalid built-in direction regex")
    })
}

/// Accept `asc`/`desc` optionally followed by `nulls first`/`nulls last`.
pub(crate) fn sanitize_direction(direction: &str) -> Option<String> {
    let trimmed = direction.trim();
    direction_regex()
        .is_match(trimmed)
        .then(|| trimmed.to_uppercase())
}

/// Input to `set`: pre-rendered assignments or a column map.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignments {
    Raw(String),
    Map(Bindings),
}

impl Assignments {
    pub(crate) fn render(&self) -> String {
        match self {
            Assignments::Raw(sql) => sql.clone(),
            Assignments::Map(columns) => {
                let mut out = String::new();
                for (i, (col, val)) in columns.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_ident(&mut out, col);
                    out.push_str(" = ");
                    write_literal(&mut out, val);
                }
                out
            }
        }
    }
}

impl From<&str> for Assignments {
    fn from(sql: &str) -> Self {
        Assignments::Raw(sql.to_string())
    }
}

impl From<String> for Assignments {
    fn from(sql: String) -> Self {
        Assignments::Raw(sql)
    }
}

impl From<Bindings> for Assignments {
    fn from(columns: Bindings) -> Self {
        Assignments::Map(columns)
    }
}

/// Filter accepted by [`fetch`](crate::qb::fetch).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFilter {
    /// `id IN (...)`
    Ids(Value),
    /// `"col" IN (...)` for every column.
    Columns(Bindings),
}

impl From<Bindings> for FetchFilter {
    fn from(columns: Bindings) -> Self {
        FetchFilter::Columns(columns)
    }
}

impl From<Value> for FetchFilter {
    fn from(ids: Value) -> Self {
        FetchFilter::Ids(ids)
    }
}

impl From<i64> for FetchFilter {
    fn from(id: i64) -> Self {
        FetchFilter::Ids(Value::Int(id))
    }
}

impl From<i32> for FetchFilter {
    fn from(id: i32) -> Self {
        FetchFilter::Ids(Value::from(id))
    }
}

impl<T: Into<Value>> From<Vec<T>> for FetchFilter {
    fn from(ids: Vec<T>) -> Self {
        FetchFilter::Ids(Value::from(ids))
    }
}
