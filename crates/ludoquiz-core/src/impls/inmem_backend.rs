//! InMemoryBackend - non-durable result backend for tests and for hosts
//! without storage.
//!
//! # Implementation
//! - `HashMap<table, HashMap<QuizId, QuizResult>>` behind a tokio `Mutex`
//! - A write transaction owns the lock guard until commit/drop
//! - `unavailable()` builds a backend whose `open` always fails, which is how
//!   a host with storage disabled looks to the store

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{BackendError, QuizId, QuizResult};
use crate::ports::{ResultBackend, WriteTransaction};

#[derive(Default)]
struct Tables {
    /// Table selected by `open`.
    open: Option<String>,
    tables: HashMap<String, HashMap<QuizId, QuizResult>>,
}

impl Tables {
    fn open_table(&self) -> Result<&HashMap<QuizId, QuizResult>, BackendError> {
        let name = self
            .open
            .as_ref()
            .ok_or_else(|| BackendError::NotOpen("<none>".to_string()))?;
        self.tables
            .get(name)
            .ok_or_else(|| BackendError::NotOpen(name.clone()))
    }
}

/// Clones share the same tables, so a clone can stand in for "the same
/// storage, reopened".
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<Tables>>,
    available: bool,
    failing_reads: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Tables::default())),
            available: true,
            failing_reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A backend that refuses to open.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Make the next `n` transactional reads fail.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn take_injected_failure(failing_reads: &AtomicUsize) -> bool {
    failing_reads
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl ResultBackend for InMemoryBackend {
    async fn open(&self, table: &str) -> Result<(), BackendError> {
        if !self.available {
            return Err(BackendError::Unavailable(
                "in-memory backend disabled".to_string(),
            ));
        }
        let mut state = self.state.lock().await;
        state.tables.entry(table.to_string()).or_default();
        state.open = Some(table.to_string());
        Ok(())
    }

    async fn begin_write(&self) -> Result<Box<dyn WriteTransaction>, BackendError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        guard.open_table()?;
        let table = guard.open.clone().unwrap_or_default();
        Ok(Box::new(InMemoryTransaction {
            guard,
            table,
            pending: HashMap::new(),
            failing_reads: Arc::clone(&self.failing_reads),
        }))
    }

    async fn scan(&self) -> Result<Vec<QuizResult>, BackendError> {
        let state = self.state.lock().await;
        Ok(state.open_table()?.values().cloned().collect())
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    table: String,
    pending: HashMap<QuizId, QuizResult>,
    failing_reads: Arc<AtomicUsize>,
}

#[async_trait]
impl WriteTransaction for InMemoryTransaction {
    async fn get(&mut self, id: &QuizId) -> Result<Option<QuizResult>, BackendError> {
        if take_injected_failure(&self.failing_reads) {
            return Err(BackendError::Other(format!("injected read failure for {id}")));
        }
        if let Some(record) = self.pending.get(id) {
            return Ok(Some(record.clone()));
        }
        Ok(self
            .guard
            .tables
            .get(&self.table)
            .and_then(|t| t.get(id))
            .cloned())
    }

    fn put(&mut self, record: QuizResult) {
        self.pending.insert(record.id.clone(), record);
    }

    async fn commit(mut self: Box<Self>) -> Result<(), BackendError> {
        let pending = std::mem::take(&mut self.pending);
        let table = self.guard.tables.entry(self.table.clone()).or_default();
        table.extend(pending);
        Ok(())
    }
}
