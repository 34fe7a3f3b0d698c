//! The fluent statement builder.

use crate::clock::{Clock, SystemClock};
use crate::compile::compile_tree;
use crate::error::{QxError, QxResult};
use crate::qb::clause::{Assignments, IntoClauses, IntoJoins, OrderBy, Source};
use crate::qb::values::Values;
use crate::quote::{quote_ident, quote_literal};
use crate::tree::{StatementKind, Tree};
use crate::value::{Bindings, Value};

/// Single-owner builder over one expression tree.
///
/// Every method consumes the builder and hands it back, so a statement reads as one
/// chain. Builder methods never fail: input that cannot be normalized is recorded
/// and reported by [`finalize`](Qx::finalize) / [`parse`](Qx::parse), together with
/// missing required clauses.
///
/// Methods that make no sense for the statement kind (e.g. `group_by` on a DELETE)
/// are accepted and ignored by the compiler.
#[derive(Debug, Clone)]
pub struct Qx {
    tree: Tree,
    build_error: Option<String>,
}

impl Qx {
    fn new(kind: StatementKind) -> Self {
        Self {
            tree: Tree::new(kind),
            build_error: None,
        }
    }

    /// Start a SELECT with the given output columns (verbatim text or sub-selects).
    pub fn select<I, S>(cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        Self::new(StatementKind::Select).columns_select(cols)
    }

    /// Start an INSERT into `table`.
    pub fn insert_into(table: &str) -> Self {
        let mut qx = Self::new(StatementKind::Insert);
        qx.tree.table = Some(quote_ident(table));
        qx
    }

    /// Start a DELETE from `table`.
    pub fn delete_from(table: &str) -> Self {
        let mut qx = Self::new(StatementKind::Delete);
        qx.tree.table = Some(quote_ident(table));
        qx
    }

    /// Start an UPDATE of `table`.
    pub fn update(table: &str) -> Self {
        let mut qx = Self::new(StatementKind::Update);
        qx.tree.table = Some(quote_ident(table));
        qx
    }

    fn columns_select<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        self.tree.select = Some(cols.into_iter().map(|c| c.into().to_raw()).collect());
        self
    }

    fn record_error(&mut self, err: QxError) {
        if self.build_error.is_none() {
            self.build_error = Some(match err {
                QxError::MalformedInput(msg) => msg,
                other => other.to_string(),
            });
        }
    }

    // ==================== SELECT ====================

    /// Replace the SELECT list. On an INSERT this turns it into `INSERT ... SELECT`.
    pub fn select_cols<I, S>(self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        self.columns_select(cols)
    }

    /// Set `DISTINCT ON (...)` expressions.
    pub fn distinct_on<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree.distinct_on = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Set FROM to a table name (quoted) or a sub-select (spliced).
    pub fn from(mut self, source: impl Into<Source>) -> Self {
        self.tree.from = Some(source.into().to_ident());
        self
    }

    /// Set FROM to verbatim SQL, e.g. `users u`.
    pub fn from_raw(mut self, sql: impl Into<String>) -> Self {
        self.tree.from = Some(sql.into());
        self
    }

    /// Alias the statement; it then compiles to `(SELECT ...) AS "name"`.
    pub fn alias(mut self, name: &str) -> Self {
        self.tree.alias = Some(quote_ident(name));
        self
    }

    // ==================== WHERE / HAVING ====================

    /// Replace the WHERE fragments.
    ///
    /// ```ignore
    /// qx::select(["id"]).from("users").where_(("age > $min", bindings! { min: 18 }));
    /// qx::select(["id"]).from("users").where_(bindings! { status: "active" });
    /// ```
    pub fn where_(mut self, clauses: impl IntoClauses) -> Self {
        self.tree.wheres = render_clauses(clauses);
        self
    }

    /// Append WHERE fragments after the existing ones.
    pub fn and_where(mut self, clauses: impl IntoClauses) -> Self {
        self.tree.wheres.extend(render_clauses(clauses));
        self
    }

    /// Replace the HAVING fragments.
    pub fn having(mut self, clauses: impl IntoClauses) -> Self {
        self.tree.having = render_clauses(clauses);
        self
    }

    /// Append HAVING fragments after the existing ones.
    pub fn and_having(mut self, clauses: impl IntoClauses) -> Self {
        self.tree.having.extend(render_clauses(clauses));
        self
    }

    // ==================== JOIN ====================

    /// Replace the JOIN chain.
    pub fn join(mut self, joins: impl IntoJoins) -> Self {
        self.tree.joins = joins.into_joins().iter().map(|j| j.render()).collect();
        self
    }

    /// Append to the JOIN chain.
    pub fn add_join(mut self, joins: impl IntoJoins) -> Self {
        self.tree
            .joins
            .extend(joins.into_joins().iter().map(|j| j.render()));
        self
    }

    /// Replace the LEFT JOIN chain.
    pub fn left_join(mut self, joins: impl IntoJoins) -> Self {
        self.tree.left_joins = joins.into_joins().iter().map(|j| j.render()).collect();
        self
    }

    /// Append to the LEFT JOIN chain.
    pub fn add_left_join(mut self, joins: impl IntoJoins) -> Self {
        self.tree
            .left_joins
            .extend(joins.into_joins().iter().map(|j| j.render()));
        self
    }

    // ==================== Grouping & ordering ====================

    pub fn group_by<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree.group_by = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Set ORDER BY keys. Directions outside `asc|desc [nulls first|last]` are dropped.
    ///
    /// ```ignore
    /// .order_by([("created_at", "desc nulls last"), ("id", "asc")])
    /// ```
    pub fn order_by<I, O>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderBy>,
    {
        self.tree.order_by = keys.into_iter().map(|k| k.into().render()).collect();
        self
    }

    // ==================== Pagination ====================

    pub fn limit(mut self, n: i64) -> Self {
        self.tree.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: i64) -> Self {
        self.tree.offset = Some(n);
        self
    }

    /// LIMIT `page_size` OFFSET `(page - 1) * page_size`.
    ///
    /// `page` is 1-based; `None` or anything below 1 means the first page. An
    /// offset past `i64::MAX` is recorded as malformed input.
    pub fn paginate(mut self, page: impl Into<Option<i64>>, page_size: i64) -> Self {
        let page = page.into().filter(|p| *p >= 1).unwrap_or(1);
        let size = page_size.max(0);
        match (page - 1).checked_mul(size) {
            Some(offset) => self.limit(size).offset(offset),
            None => {
                self.record_error(QxError::malformed(format!(
                    "paginate() offset overflows for page {page} of size {size}"
                )));
                self
            }
        }
    }

    // ==================== INSERT / UPDATE ====================

    /// Set the INSERT column list (for `INSERT ... SELECT`).
    pub fn columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tree.insert_columns = cols.into_iter().map(|c| quote_ident(c.as_ref())).collect();
        self
    }

    /// Set the rows to insert; the INSERT column list is taken from them.
    pub fn values(mut self, values: impl Into<Values>) -> Self {
        match values.into().normalize() {
            Ok((columns, rows)) => {
                self.tree.insert_columns = columns;
                self.tree.values = Some(rows);
            }
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Append the same columns and values to every row already set by `values`.
    pub fn common_values(mut self, columns: impl Into<Bindings>) -> Self {
        let columns = columns.into();
        let Some(rows) = self.tree.values.as_mut() else {
            self.record_error(QxError::malformed(
                "common_values() called before values()",
            ));
            return self;
        };
        let literals: Vec<String> = columns.iter().map(|(_, v)| quote_literal(v)).collect();
        for row in rows.iter_mut() {
            row.extend(literals.iter().cloned());
        }
        self.tree
            .insert_columns
            .extend(columns.keys().map(quote_ident));
        self
    }

    /// Set the UPDATE assignments from raw SQL or a column map.
    pub fn set(mut self, assignments: impl Into<Assignments>) -> Self {
        self.tree.set = Some(assignments.into().render());
        self
    }

    /// Stamp `created_at`/`updated_at` (INSERT) or `updated_at` (UPDATE) with the
    /// current time.
    pub fn ts(self) -> Self {
        self.ts_with(&SystemClock)
    }

    /// Alias for [`ts`](Qx::ts).
    pub fn timestamps(self) -> Self {
        self.ts()
    }

    /// [`ts`](Qx::ts) with an explicit clock. The time is read once per call.
    pub fn ts_with(mut self, clock: &impl Clock) -> Self {
        let now = quote_literal(&Value::Timestamp(clock.now()));
        if let Some(rows) = self.tree.values.as_mut() {
            self.tree
                .insert_columns
                .extend(["created_at".to_string(), "updated_at".to_string()]);
            for row in rows.iter_mut() {
                row.push(now.clone());
                row.push(now.clone());
            }
        } else if let Some(set) = self.tree.set.as_mut() {
            set.push_str(", updated_at = ");
            set.push_str(&now);
        }
        self
    }

    pub fn returning<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tree.returning = cols.into_iter().map(|c| quote_ident(c.as_ref())).collect();
        self
    }

    /// Prefix the compiled statement with `EXPLAIN`.
    pub fn explain(mut self) -> Self {
        self.tree.explain = true;
        self
    }

    // ==================== Helpers ====================

    /// Wrap this query so it returns its rows as one JSON array:
    /// `SELECT array_to_json(array_agg(row_to_json(name))) FROM (...) AS "name"`.
    pub fn to_json(self, name: &str) -> QxResult<Qx> {
        let inner = self.alias(name).finalize()?;
        Ok(Qx::select([format!("array_to_json(array_agg(row_to_json({name})))")]).from(inner))
    }

    // ==================== Build ====================

    /// The tree built so far (not validated).
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn kind(&self) -> StatementKind {
        self.tree.kind
    }

    /// The first malformed-input message recorded by a builder method, if any.
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    fn check(&self) -> QxResult<()> {
        if let Some(err) = &self.build_error {
            return Err(QxError::MalformedInput(err.clone()));
        }
        self.tree.validate()
    }

    /// Validate and freeze the statement.
    ///
    /// Fails with [`QxError::MalformedInput`] if a builder method rejected its input
    /// and with [`QxError::MissingClause`] if FROM (SELECT, INSERT ... SELECT),
    /// SET (UPDATE) or VALUES (INSERT) was never set.
    pub fn finalize(self) -> QxResult<Tree> {
        self.check()?;
        tracing::debug!(
            target: "qx.compile",
            kind = ?self.tree.kind,
            table = self.tree.table.as_deref().unwrap_or("-"),
            "statement finalized"
        );
        Ok(self.tree)
    }

    /// Validate and compile to SQL text without consuming the builder.
    pub fn parse(&self) -> QxResult<String> {
        self.check()?;
        Ok(compile_tree(&self.tree))
    }
}

/// Render clauses, skipping ones that come out empty (e.g. an empty column map).
fn render_clauses(clauses: impl IntoClauses) -> Vec<String> {
    clauses
        .into_clauses()
        .iter()
        .map(|c| c.render())
        .filter(|s| !s.is_empty())
        .collect()
}
