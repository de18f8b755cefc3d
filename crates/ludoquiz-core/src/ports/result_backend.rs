//! ResultBackend port - transactional keyed storage for quiz results.
//!
//! The backend owns one table of `{id, score}` records keyed by `id`.
//!
//! # Design
//! - `open` is create-if-absent and safe to call on every process start.
//! - A `WriteTransaction` holds the backend's single writer scope from
//!   `begin_write` until `commit` or drop. Read-then-write merges inside one
//!   transaction are therefore serialized per backend.
//! - `scan` takes the same scope, so it sees a serializable point-in-time
//!   snapshot: every committed transaction or none of it.

use async_trait::async_trait;

use crate::domain::{BackendError, QuizId, QuizResult};

#[async_trait]
pub trait ResultBackend: Send + Sync {
    /// Ensure `table` exists and make it the target of later operations.
    async fn open(&self, table: &str) -> Result<(), BackendError>;

    /// Start a write transaction on the open table.
    async fn begin_write(&self) -> Result<Box<dyn WriteTransaction>, BackendError>;

    /// Every stored record. Order is unspecified.
    async fn scan(&self) -> Result<Vec<QuizResult>, BackendError>;
}

/// A single-writer transaction.
///
/// Dropping the transaction without calling `commit` discards its writes.
#[async_trait]
pub trait WriteTransaction: Send {
    /// Current record for `id`, including writes made earlier in this
    /// transaction.
    async fn get(&mut self, id: &QuizId) -> Result<Option<QuizResult>, BackendError>;

    /// Stage `record`, replacing any record with the same id.
    fn put(&mut self, record: QuizResult);

    /// Make staged writes durable and release the writer scope.
    async fn commit(self: Box<Self>) -> Result<(), BackendError>;
}
