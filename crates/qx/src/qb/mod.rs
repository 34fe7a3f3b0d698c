//! Statement builders.
//!
//! Each factory stamps the statement kind once; the returned [`Qx`] is then refined
//! with chained clause methods and turned into SQL by [`Qx::parse`] or
//! [`Qx::finalize`] + [`compile`](crate::compile()).
//!
//! # Usage
//!
//! ```ignore
//! use qx::{bindings, qb};
//!
//! // SELECT
//! let sql = qb::select(["id", "name"])
//!     .from("users")
//!     .where_(("created_at > $since", bindings! { since: since }))
//!     .and_where(bindings! { status: vec!["active", "pending"] })
//!     .order_by([("created_at", "desc")])
//!     .paginate(page, 20)
//!     .parse()?;
//!
//! // INSERT
//! let sql = qb::insert_into("users")
//!     .values(bindings! { name: "alice", email: "alice@example.com" })
//!     .ts()
//!     .returning(["id"])
//!     .parse()?;
//!
//! // UPDATE
//! let sql = qb::update("users")
//!     .set(bindings! { status: "inactive" })
//!     .where_(bindings! { id: user_id })
//!     .parse()?;
//!
//! // DELETE
//! let sql = qb::delete_from("users").where_(("id = $id", bindings! { id: user_id })).parse()?;
//! ```

mod builder;
mod clause;
mod values;

pub use builder::Qx;
pub use clause::{
    Assignments, Clause, FetchFilter, IntoClauses, IntoJoins, Join, OrderBy, Source, quote_source,
};
pub use values::Values;

use crate::value::Bindings;

/// Create a SELECT builder with the given output columns.
///
/// # Example
/// ```ignore
/// let qx = qx::qb::select(["id", "name"]).from("users");
/// ```
pub fn select<I, S>(cols: I) -> Qx
where
    I: IntoIterator<Item = S>,
    S: Into<Source>,
{
    Qx::select(cols)
}

/// Create an INSERT builder for the given table.
pub fn insert_into(table: &str) -> Qx {
    Qx::insert_into(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> Qx {
    Qx::update(table)
}

/// Create a DELETE builder for the given table.
pub fn delete_from(table: &str) -> Qx {
    Qx::delete_from(table)
}

/// `SELECT * FROM table` filtered by id(s) or by a column map.
///
/// # Example
/// ```ignore
/// qb::fetch("users", vec![1, 2, 3]);                   // WHERE (id IN (1, 2, 3))
/// qb::fetch("users", bindings! { email: "a@b.c" });    // WHERE ("email" IN ($Q$a@b.c$Q$))
/// ```
pub fn fetch(table: &str, filter: impl Into<FetchFilter>) -> Qx {
    let qx = select(["*"]).from(table);
    match filter.into() {
        FetchFilter::Ids(ids) => qx.where_(("id IN ($ids)", Bindings::new().bind("ids", ids))),
        FetchFilter::Columns(columns) => qx.where_(columns),
    }
}

#[cfg(test)]
mod tests;
