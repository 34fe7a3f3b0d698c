//! Convenient imports for typical `qx` usage.
//!
//! ```ignore
//! use qx::prelude::*;
//! ```

pub use crate::bindings;
pub use crate::{
    Bindings, ExecOptions, Executor, Output, Qx, QxError, QxResult, RowFormat, Tree, Value,
    delete_from, fetch, insert_into, select, update,
};

#[cfg(feature = "pool")]
pub use crate::{PoolOptions, create_pool, create_pool_with_options};
