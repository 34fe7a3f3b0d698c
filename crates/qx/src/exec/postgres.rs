//! [`Executor`] implementations for the postgres driver.

use super::{Executor, Record};
use crate::error::{QxError, QxResult};
use std::sync::Arc;
use tokio_postgres::SimpleQueryMessage;

/// Collect the data rows of a simple-query response.
///
/// Consecutive rows with the same column names share one column list.
fn records_from(messages: Vec<SimpleQueryMessage>) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    for message in messages {
        let SimpleQueryMessage::Row(row) = message else {
            continue;
        };
        let names: Vec<&str> = row.columns().iter().map(|c| c.name()).collect();
        let columns = match records.last() {
            Some(prev) if prev.shares_columns(&names) => prev.column_list(),
            _ => names.iter().map(|n| n.to_string()).collect::<Arc<[String]>>(),
        };
        let values = (0..row.len()).map(|i| row.get(i).map(str::to_string)).collect();
        records.push(Record::new(columns, values));
    }
    records
}

impl Executor for tokio_postgres::Client {
    async fn simple_query(&self, sql: &str) -> QxResult<Vec<Record>> {
        tokio_postgres::Client::simple_query(self, sql)
            .await
            .map(records_from)
            .map_err(QxError::from_db_error)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn simple_query(&self, sql: &str) -> QxResult<Vec<Record>> {
        tokio_postgres::Transaction::simple_query(self, sql)
            .await
            .map(records_from)
            .map_err(QxError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn simple_query(&self, sql: &str) -> QxResult<Vec<Record>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        Executor::simple_query(&**self, sql).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::ClientWrapper {
    async fn simple_query(&self, sql: &str) -> QxResult<Vec<Record>> {
        Executor::simple_query(&**self, sql).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Transaction<'_> {
    async fn simple_query(&self, sql: &str) -> QxResult<Vec<Record>> {
        Executor::simple_query(&**self, sql).await
    }
}
