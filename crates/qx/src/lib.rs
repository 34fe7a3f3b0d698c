//! # qx
//!
//! A small expression-tree SQL builder for PostgreSQL.
//!
//! Statements are assembled with chained clause methods, frozen into an immutable
//! [`Tree`] and compiled to SQL text in which every identifier and value is already
//! quoted. There are no bind parameters: values are rendered as literals
//! (text dollar-quoted), and free-text fragments are trusted verbatim except at
//! `$name` placeholders.
//!
//! ## Features
//!
//! - **Clause builders**: `select`, `insert_into`, `update`, `delete_from`, joins,
//!   grouping, ordering, pagination, `RETURNING`, `EXPLAIN`
//! - **Nesting**: finalized trees can be used as FROM sources, JOIN sources, select
//!   columns or placeholder values
//! - **Infallible compile**: required clauses are checked once, at `finalize()`
//! - **Execution**: run compiled SQL through any [`Executor`] (`tokio_postgres`
//!   clients and transactions, pooled clients with the `pool` feature)
//!
//! ## Example
//!
//! ```ignore
//! use qx::{bindings, qb};
//!
//! let recent = qb::select(["user_id"])
//!     .from("orders")
//!     .where_(("created_at > $since", bindings! { since: since }))
//!     .finalize()?;
//!
//! let sql = qb::select(["id", "name"])
//!     .from("users")
//!     .where_(("id IN ($ids)", bindings! { ids: recent }))
//!     .order_by([("name", "asc")])
//!     .paginate(2, 50)
//!     .parse()?;
//! // SELECT id, name FROM "users" WHERE (id IN (SELECT user_id FROM "orders" WHERE ...))
//! //   ORDER BY name ASC LIMIT 50 OFFSET 50
//! ```

pub mod clock;
pub mod compile;
pub mod error;
pub mod exec;
pub mod interpolate;
pub mod prelude;
pub mod qb;
pub mod quote;
pub mod tree;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use compile::{Fragment, compile};
pub use error::{QxError, QxResult};
pub use exec::{ExecOptions, Executor, Output, Record, RowFormat, execute, execute_raw};
pub use interpolate::interpolate;
pub use quote::{quote_ident, quote_literal};
pub use tree::{JoinClause, StatementKind, Tree};
pub use value::{Bindings, ColumnMap, Value};

pub use qb::{
    Assignments, Clause, FetchFilter, Join, OrderBy, Qx, Source, Values, delete_from, fetch,
    insert_into, quote_source, select, update,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{PoolOptions, create_pool, create_pool_with_config, create_pool_with_options};

#[cfg(feature = "pretty")]
pub mod pretty;
