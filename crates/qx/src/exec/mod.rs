//! Running compiled statements against a database.
//!
//! The core never opens connections; callers hand an [`Executor`] to [`execute`]
//! (or [`Qx::execute`](crate::Qx::execute)). Implementations are provided for
//! `tokio_postgres::Client`, `tokio_postgres::Transaction` and, with the `pool`
//! feature, the `deadpool_postgres` client types. Transactions are demarcated by the
//! driver as usual:
//!
//! ```ignore
//! let tx = client.transaction().await?;
//! qx::update("accounts").set("balance = balance - 1").where_(bindings! { id: 1 })
//!     .execute(&tx, &ExecOptions::new())
//!     .await?;
//! tx.commit().await?;
//! ```

mod options;
mod postgres;
mod record;

pub use options::{ExecOptions, RowFormat};
pub use record::{Output, Record};

use crate::error::QxResult;
use crate::interpolate::interpolate_cow;
use crate::qb::Qx;
use crate::tree::Tree;
use crate::value::Bindings;
use std::borrow::Cow;
use std::future::Future;
use tracing::Level;

/// Something that can run raw SQL text and hand back its rows.
pub trait Executor: Send + Sync {
    /// Run `sql` (one or more statements, no parameters) and collect the rows.
    fn simple_query(&self, sql: &str) -> impl Future<Output = QxResult<Vec<Record>>> + Send;
}

/// Run compiled SQL and shape the rows as `options.format` asks.
///
/// NUL characters are stripped from `sql` first; the server rejects them in query
/// text.
pub async fn execute<E: Executor>(
    executor: &E,
    sql: &str,
    options: &ExecOptions,
) -> QxResult<Output> {
    let sql = strip_nul(sql);
    if options.verbose {
        log_sql(options, &sql);
    }
    let records = executor.simple_query(&sql).await?;
    tracing::debug!(target: "qx.sql", rows = records.len(), "statement executed");
    Ok(match options.format {
        RowFormat::Rows => Output::Rows(records),
        RowFormat::Columns => Output::columns_from(records),
    })
}

/// Interpolate `$name` tokens in hand-written SQL, then [`execute`] it.
///
/// ```ignore
/// let out = qx::execute_raw(&client, "SELECT * FROM users WHERE id = $id",
///     &bindings! { id: 5 }, &ExecOptions::new()).await?;
/// ```
pub async fn execute_raw<E: Executor>(
    executor: &E,
    template: &str,
    bindings: &Bindings,
    options: &ExecOptions,
) -> QxResult<Output> {
    let sql = interpolate_cow(template, bindings);
    execute(executor, &sql, options).await
}

impl Qx {
    /// Validate, compile and run the statement.
    pub async fn execute<E: Executor>(&self, executor: &E, options: &ExecOptions) -> QxResult<Output> {
        let sql = self.parse()?;
        execute(executor, &sql, options).await
    }
}

impl Tree {
    /// Compile and run the statement.
    pub async fn execute<E: Executor>(&self, executor: &E, options: &ExecOptions) -> QxResult<Output> {
        execute(executor, &self.to_sql(), options).await
    }
}

fn strip_nul(sql: &str) -> Cow<'_, str> {
    if sql.contains('\0') {
        Cow::Owned(sql.replace('\0', ""))
    } else {
        Cow::Borrowed(sql)
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn log_sql(options: &ExecOptions, sql: &str) {
    /// Dispatch a tracing event at a runtime-determined level.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                Level::ERROR => tracing::error!($($field)*),
                Level::WARN  => tracing::warn!($($field)*),
                Level::INFO  => tracing::info!($($field)*),
                Level::DEBUG => tracing::debug!($($field)*),
                Level::TRACE => tracing::trace!($($field)*),
            }
        };
    }

    let shown = logged_sql(options, sql);
    emit_at_level!(options.log_level, target: "qx.sql", sql = %shown);
}

/// The SQL text as it appears in the verbose event.
fn logged_sql<'a>(options: &ExecOptions, sql: &'a str) -> Cow<'a, str> {
    match options.max_sql_length {
        Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max))),
        _ => Cow::Borrowed(sql),
    }
}
