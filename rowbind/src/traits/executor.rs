//! Executor trait for running bound statements

use crate::batch::PreparedBatch;
use crate::error::Result;
use crate::statement::NamedStatement;
use crate::traits::{FromValue, Record};
use async_trait::async_trait;

/// Result of a statement execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Number of rows affected by the statement (summed over batch parts)
    pub rows_affected: u64,
    /// Last insert ID (for INSERT statements)
    pub last_insert_id: Option<u64>,
}

/// Runs bound statements and maps their rows.
///
/// Fetching maps every row through a [`RowMapper`](crate::RowMapper) built
/// from the executor's descriptor cache and decoder registry.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    async fn execute(&self, statement: NamedStatement) -> Result<ExecuteResult>;

    /// Execute every part of a batch.
    async fn execute_batch(&self, batch: PreparedBatch) -> Result<ExecuteResult>;

    /// Fetch and map all rows; stops at the first row that fails to map.
    async fn fetch_all<T: Record + Send>(&self, statement: NamedStatement) -> Result<Vec<T>>;

    /// Fetch and map the first row, if any.
    async fn fetch_optional<T: Record + Send>(
        &self,
        statement: NamedStatement,
    ) -> Result<Option<T>>;

    /// Fetch exactly one row, returning an error if not found.
    async fn fetch_one<T: Record + Send>(&self, statement: NamedStatement) -> Result<T>;

    /// Fetch a scalar value (first column of first row).
    async fn fetch_scalar<T: FromValue + Send>(&self, statement: NamedStatement) -> Result<T>;
}
