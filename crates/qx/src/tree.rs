//! The finalized expression tree.
//!
//! A [`Tree`] holds one statement whose clauses have already been normalized into
//! SQL text fragments (identifiers quoted, literals quoted, placeholders
//! interpolated). It is produced by [`Qx::finalize`](crate::Qx::finalize), which also
//! checks required clauses, so compiling a `Tree` cannot fail.

use crate::compile::compile_tree;
use crate::error::{QxError, QxResult};
use std::fmt;

/// The statement shape a tree compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// SQL keyword(s) introducing the statement.
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT INTO",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE FROM",
        }
    }
}

/// A `JOIN <source> ON <condition>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub source: String,
    pub on: String,
}

/// One normalized SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub(crate) kind: StatementKind,
    /// INSERT INTO / UPDATE / DELETE FROM target (quoted).
    pub(crate) table: Option<String>,
    pub(crate) select: Option<Vec<String>>,
    pub(crate) distinct_on: Vec<String>,
    pub(crate) from: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) left_joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<String>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: Vec<String>,
    pub(crate) order_by: Vec<(String, Option<String>)>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) alias: Option<String>,
    pub(crate) explain: bool,
    pub(crate) insert_columns: Vec<String>,
    pub(crate) values: Option<Vec<Vec<String>>>,
    pub(crate) set: Option<String>,
    pub(crate) returning: Vec<String>,
}

impl Tree {
    pub(crate) fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            table: None,
            select: None,
            distinct_on: Vec::new(),
            from: None,
            joins: Vec::new(),
            left_joins: Vec::new(),
            wheres: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            alias: None,
            explain: false,
            insert_columns: Vec::new(),
            values: None,
            set: None,
            returning: Vec::new(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Quoted target table of INSERT/UPDATE/DELETE.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// WHERE fragments in insertion order (unparenthesized).
    pub fn where_clauses(&self) -> &[String] {
        &self.wheres
    }

    pub fn having_clauses(&self) -> &[String] {
        &self.having
    }

    /// Quoted INSERT columns.
    pub fn insert_columns(&self) -> &[String] {
        &self.insert_columns
    }

    /// Quoted VALUES rows.
    pub fn values(&self) -> Option<&[Vec<String>]> {
        self.values.as_deref()
    }

    pub fn set_clause(&self) -> Option<&str> {
        self.set.as_deref()
    }

    /// Check that every clause the statement kind needs is present.
    pub(crate) fn validate(&self) -> QxResult<()> {
        match self.kind {
            StatementKind::Select => {
                if self.from.is_none() {
                    return Err(QxError::missing("SELECT", "FROM"));
                }
            }
            StatementKind::Insert => {
                if self.select.is_some() {
                    if self.from.is_none() {
                        return Err(QxError::missing("INSERT INTO ... SELECT", "FROM"));
                    }
                } else if self.values.is_none() {
                    return Err(QxError::missing("INSERT INTO", "VALUES (or SELECT)"));
                }
            }
            StatementKind::Update => {
                if self.set.is_none() {
                    return Err(QxError::missing("UPDATE", "SET"));
                }
            }
            StatementKind::Delete => {}
        }
        Ok(())
    }

    /// Compile to SQL text.
    pub fn to_sql(&self) -> String {
        compile_tree(self)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&compile_tree(self))
    }
}
