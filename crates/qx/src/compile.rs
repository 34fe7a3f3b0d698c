//! Compiler from expression trees to SQL text.

use crate::tree::{JoinClause, StatementKind, Tree};
use std::sync::Arc;

/// Anything the compiler accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Already-compiled SQL, passed through unchanged.
    Text(String),
    /// A finalized tree.
    Tree(Arc<Tree>),
    /// Fragments compiled one by one and joined with `,`.
    List(Vec<Fragment>),
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Text(s.to_string())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Text(s)
    }
}

impl From<Tree> for Fragment {
    fn from(t: Tree) -> Self {
        Fragment::Tree(Arc::new(t))
    }
}

impl From<Arc<Tree>> for Fragment {
    fn from(t: Arc<Tree>) -> Self {
        Fragment::Tree(t)
    }
}

impl<T: Into<Fragment>> From<Vec<T>> for Fragment {
    fn from(items: Vec<T>) -> Self {
        Fragment::List(items.into_iter().map(Into::into).collect())
    }
}

/// Compile a fragment to SQL text.
///
/// ```ignore
/// let tree = qx::select(["id"]).from("users").finalize()?;
/// assert_eq!(qx::compile(&tree.into()), r#"SELECT id FROM "users""#);
/// ```
pub fn compile(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Text(s) => s.clone(),
        Fragment::Tree(tree) => compile_tree(tree),
        Fragment::List(items) => items.iter().map(compile).collect::<Vec<_>>().join(","),
    }
}

/// Compile a tree, dispatching on its statement kind.
pub(crate) fn compile_tree(tree: &Tree) -> String {
    let mut sql = String::with_capacity(128);
    match tree.kind {
        StatementKind::Insert => write_insert(&mut sql, tree),
        StatementKind::Select => write_select(&mut sql, tree),
        StatementKind::Delete => write_delete(&mut sql, tree),
        StatementKind::Update => write_update(&mut sql, tree),
    }
    sql
}

fn write_select(sql: &mut String, tree: &Tree) {
    write_select_body(sql, tree);
    if let Some(alias) = &tree.alias {
        let body = std::mem::take(sql);
        *sql = format!("({body}) AS {alias}");
    }
    if tree.explain {
        sql.insert_str(0, "EXPLAIN ");
    }
}

fn write_select_body(sql: &mut String, tree: &Tree) {
    sql.push_str("SELECT");
    if !tree.distinct_on.is_empty() {
        sql.push_str(" DISTINCT ON (");
        sql.push_str(&tree.distinct_on.join(", "));
        sql.push(')');
    }
    sql.push(' ');
    match tree.select.as_deref() {
        Some(cols) if !cols.is_empty() => sql.push_str(&cols.join(", ")),
        _ => sql.push('*'),
    }
    if let Some(from) = &tree.from {
        sql.push_str(" FROM ");
        sql.push_str(from);
    }
    write_joins(sql, "JOIN", &tree.joins);
    write_joins(sql, "LEFT JOIN", &tree.left_joins);
    write_conditions(sql, "WHERE", &tree.wheres);
    if !tree.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&tree.group_by.join(", "));
    }
    write_conditions(sql, "HAVING", &tree.having);
    if !tree.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, (col, dir)) in tree.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(col);
            if let Some(dir) = dir {
                sql.push(' ');
                sql.push_str(dir);
            }
        }
    }
    if let Some(limit) = tree.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = tree.offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
}

fn write_insert(sql: &mut String, tree: &Tree) {
    sql.push_str("INSERT INTO ");
    sql.push_str(tree.table.as_deref().unwrap_or_default());
    if !tree.insert_columns.is_empty() {
        sql.push_str(" (");
        sql.push_str(&tree.insert_columns.join(", "));
        sql.push(')');
    }
    if tree.select.is_some() {
        sql.push(' ');
        write_select_body(sql, tree);
    } else if let Some(rows) = &tree.values {
        sql.push_str(" VALUES ");
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            sql.push_str(&row.join(", "));
            sql.push(')');
        }
    }
    write_returning(sql, &tree.returning);
}

fn write_delete(sql: &mut String, tree: &Tree) {
    sql.push_str("DELETE FROM ");
    sql.push_str(tree.table.as_deref().unwrap_or_default());
    write_conditions(sql, "WHERE", &tree.wheres);
    write_returning(sql, &tree.returning);
}

fn write_update(sql: &mut String, tree: &Tree) {
    sql.push_str("UPDATE ");
    sql.push_str(tree.table.as_deref().unwrap_or_default());
    if let Some(set) = &tree.set {
        sql.push_str(" SET ");
        sql.push_str(set);
    }
    if let Some(from) = &tree.from {
        sql.push_str(" FROM ");
        sql.push_str(from);
    }
    write_conditions(sql, "WHERE", &tree.wheres);
    write_returning(sql, &tree.returning);
}

fn write_joins(sql: &mut String, keyword: &str, joins: &[JoinClause]) {
    for join in joins {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(&join.source);
        sql.push_str(" ON ");
        sql.push_str(&join.on);
    }
}

/// ` WHERE (a) AND (b)`
fn write_conditions(sql: &mut String, keyword: &str, conditions: &[String]) {
    if conditions.is_empty() {
        return;
    }
    sql.push(' ');
    sql.push_str(keyword);
    sql.push(' ');
    for (i, cond) in conditions.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push('(');
        sql.push_str(cond);
        sql.push(')');
    }
}

fn write_returning(sql: &mut String, returning: &[String]) {
    if !returning.is_empty() {
        sql.push_str(" RETURNING ");
        sql.push_str(&returning.join(", "));
    }
}
