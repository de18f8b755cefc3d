//! ResultStore - merge-on-submit persistence of quiz results.
//!
//! The store wraps a `ResultBackend` in the connection state machine:
//!
//! ```text
//! Uninitialized --initialize--> Opening --open ok----> Ready
//!                                       \--open err--> Unavailable
//! ```
//!
//! `Unavailable` is terminal: there is no retry, `submit` drops and
//! `load_all` returns nothing for the rest of the process. None of the
//! public operations return errors; backend faults are logged here.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{BackendError, ConnectionState, QuizResult};
use crate::ports::ResultBackend;

pub const DEFAULT_TABLE: &str = "results";

pub struct ResultStore {
    backend: Arc<dyn ResultBackend>,
    table: String,
    state: watch::Sender<ConnectionState>,
}

impl ResultStore {
    pub fn new(backend: Arc<dyn ResultBackend>) -> Self {
        Self::with_table(backend, DEFAULT_TABLE)
    }

    pub fn with_table(backend: Arc<dyn ResultBackend>, table: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Uninitialized);
        Self {
            backend,
            table: table.into(),
            state,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Open the backend table (create-if-absent).
    ///
    /// Only the first call opens the backend. Later calls wait for that
    /// attempt to settle and report its outcome.
    pub async fn initialize(&self) -> ConnectionState {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if state.can_transition_to(ConnectionState::Opening) {
                *state = ConnectionState::Opening;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            return self.settled().await;
        }

        let next = match self.backend.open(&self.table).await {
            Ok(()) => {
                info!(table = %self.table, "result store ready");
                ConnectionState::Ready
            }
            Err(err) => {
                warn!(table = %self.table, error = %err, "result storage unavailable, history disabled");
                ConnectionState::Unavailable
            }
        };
        self.state.send_replace(next);
        next
    }

    /// Wait until the open attempt has settled.
    async fn settled(&self) -> ConnectionState {
        let current = self.connection_state();
        if current.is_settled() || current == ConnectionState::Uninitialized {
            return current;
        }
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|state| state.is_settled()).await {
            Ok(state) => *state,
            // The sender lives in `self`; it cannot be gone while we wait.
            Err(_) => ConnectionState::Unavailable,
        };
        settled
    }

    /// Store `result`, keeping the best score per quiz.
    ///
    /// Returns the record now stored, or `None` if the submission was
    /// dropped (store not ready, backend fault).
    pub async fn submit(&self, result: QuizResult) -> Option<QuizResult> {
        match self.settled().await {
            ConnectionState::Ready => {}
            ConnectionState::Uninitialized => {
                warn!(id = %result.id, "result submitted before initialize, dropped");
                return None;
            }
            _ => {
                debug!(id = %result.id, "result storage unavailable, dropped");
                return None;
            }
        }

        let id = result.id.clone();
        match self.merge(result).await {
            Ok(stored) => {
                debug!(id = %stored.id, score = stored.score, "result stored");
                Some(stored)
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to store result");
                None
            }
        }
    }

    /// Read-then-write inside one backend write transaction.
    async fn merge(&self, submitted: QuizResult) -> Result<QuizResult, BackendError> {
        let mut tx = self.backend.begin_write().await?;
        let existing = match tx.get(&submitted.id).await {
            Ok(existing) => existing,
            Err(err) => {
                // Treated as absent: the submitted score is written as is.
                warn!(id = %submitted.id, error = %err, "merge read failed, overwriting stored score");
                None
            }
        };
        let merged = QuizResult::merged_with(existing, submitted);
        tx.put(merged.clone());
        tx.commit().await?;
        Ok(merged)
    }

    /// Snapshot of every stored result. Order is unspecified.
    ///
    /// Empty when the store is not ready or the scan fails.
    pub async fn load_all(&self) -> Vec<QuizResult> {
        if self.settled().await != ConnectionState::Ready {
            return Vec::new();
        }
        match self.backend.scan().await {
            Ok(results) => results,
            Err(err) => {
                warn!(table = %self.table, error = %err, "failed to load results");
                Vec::new()
            }
        }
    }
}
