//! FileBackend - durable result backend on the local filesystem.
//!
//! Layout: `<dir>/<table>.json`, a JSON array of `{ "id": ..., "score": ... }`.
//!
//! - `open` creates the directory and an empty table file if missing, then
//!   loads the table into memory.
//! - `commit` writes the whole table to `<table>.json.tmp`, syncs it, renames
//!   it over the table file and syncs the directory, so a crash mid-write
//!   leaves either the previous table or the new one.
//! - One process owns the directory. The in-process writer scope is a tokio
//!   `Mutex`, the same as `InMemoryBackend`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::domain::{BackendError, QuizId, QuizResult};
use crate::ports::{ResultBackend, WriteTransaction};

#[derive(Default)]
struct FileState {
    table: Option<String>,
    records: BTreeMap<QuizId, QuizResult>,
}

pub struct FileBackend {
    dir: PathBuf,
    state: Arc<Mutex<FileState>>,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Arc::new(Mutex::new(FileState::default())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BackendError {
    BackendError::Io {
        path: path.to_path_buf(),
        source,
    }
}

async fn write_table(
    path: &Path,
    table: &str,
    records: &BTreeMap<QuizId, QuizResult>,
) -> Result<(), BackendError> {
    let rows: Vec<&QuizResult> = records.values().collect();
    let bytes = serde_json::to_vec_pretty(&rows).map_err(|source| BackendError::Codec {
        table: table.to_string(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    file.sync_all().await.map_err(|e| io_error(&tmp, e))?;
    drop(file);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))?;
    sync_parent_dir(path).await;
    Ok(())
}

/// Make the rename durable. Best effort: not every platform can open a
/// directory for syncing.
async fn sync_parent_dir(path: &Path) {
    let Some(dir) = path.parent() else {
        return;
    };
    let synced = match tokio::fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = synced {
        debug!(dir = %dir.display(), error = %e, "directory sync skipped");
    }
}

#[async_trait]
impl ResultBackend for FileBackend {
    async fn open(&self, table: &str) -> Result<(), BackendError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let path = self.table_path(table);
        let mut state = self.state.lock().await;

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                warn!(path = %path.display(), "empty result table file, starting from no records");
                BTreeMap::new()
            }
            Ok(bytes) => {
                let rows: Vec<QuizResult> =
                    serde_json::from_slice(&bytes).map_err(|source| BackendError::Codec {
                        table: table.to_string(),
                        source,
                    })?;
                rows.into_iter().map(|r| (r.id.clone(), r)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "creating result table");
                let empty = BTreeMap::new();
                write_table(&path, table, &empty).await?;
                empty
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        state.table = Some(table.to_string());
        state.records = records;
        Ok(())
    }

    async fn begin_write(&self) -> Result<Box<dyn WriteTransaction>, BackendError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let table = guard
            .table
            .clone()
            .ok_or_else(|| BackendError::NotOpen("<none>".to_string()))?;
        let path = self.table_path(&table);
        Ok(Box::new(FileTransaction {
            guard,
            table,
            path,
            pending: BTreeMap::new(),
        }))
    }

    async fn scan(&self) -> Result<Vec<QuizResult>, BackendError> {
        let state = self.state.lock().await;
        if state.table.is_none() {
            return Err(BackendError::NotOpen("<none>".to_string()));
        }
        Ok(state.records.values().cloned().collect())
    }
}

struct FileTransaction {
    guard: OwnedMutexGuard<FileState>,
    table: String,
    path: PathBuf,
    pending: BTreeMap<QuizId, QuizResult>,
}

#[async_trait]
impl WriteTransaction for FileTransaction {
    async fn get(&mut self, id: &QuizId) -> Result<Option<QuizResult>, BackendError> {
        Ok(self
            .pending
            .get(id)
            .or_else(|| self.guard.records.get(id))
            .cloned())
    }

    fn put(&mut self, record: QuizResult) {
        self.pending.insert(record.id.clone(), record);
    }

    async fn commit(mut self: Box<Self>) -> Result<(), BackendError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut next = self.guard.records.clone();
        next.extend(std::mem::take(&mut self.pending));
        write_table(&self.path, &self.table, &next).await?;
        // Only visible in memory once the file is in place.
        self.guard.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionState;
    use crate::store::ResultStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_an_empty_table_file() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("db"));
        backend.open("results").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("db").join("results.json")).unwrap();
        let rows: Vec<QuizResult> = serde_json::from_str(&raw).unwrap();
        assert!(rows.is_empty());
        assert!(backend.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_records_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let backend = FileBackend::new(dir.path());
            backend.open("results").await.unwrap();
            let mut tx = backend.begin_write().await.unwrap();
            tx.put(QuizResult::new("q1", 3));
            tx.put(QuizResult::new("q2", 1));
            tx.commit().await.unwrap();
        }

        let backend = FileBackend::new(dir.path());
        backend.open("results").await.unwrap();
        let mut rows = backend.scan().await.unwrap();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(
            rows,
            vec![QuizResult::new("q1", 3), QuizResult::new("q2", 1)]
        );
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.open("results").await.unwrap();
        let mut tx = backend.begin_write().await.unwrap();
        tx.put(QuizResult::new("q1", 2));
        tx.commit().await.unwrap();

        backend.open("results").await.unwrap();
        assert_eq!(backend.scan().await.unwrap(), vec![QuizResult::new("q1", 2)]);
    }

    #[tokio::test]
    async fn uncommitted_writes_never_reach_disk() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.open("results").await.unwrap();
        {
            let mut tx = backend.begin_write().await.unwrap();
            tx.put(QuizResult::new("q1", 9));
        }

        let reopened = FileBackend::new(dir.path());
        reopened.open("results").await.unwrap();
        assert!(reopened.scan().await.unwrap().is_empty());
        assert!(backend.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn commit_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.open("results").await.unwrap();
        let mut tx = backend.begin_write().await.unwrap();
        tx.put(QuizResult::new("q1", 3));
        tx.commit().await.unwrap();

        assert!(!dir.path().join("results.json.tmp").exists());
        let raw = std::fs::read_to_string(dir.path().join("results.json")).unwrap();
        let rows: Vec<QuizResult> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows, vec![QuizResult::new("q1", 3)]);
    }

    #[tokio::test]
    async fn truncated_table_file_opens_empty_and_accepts_writes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("results.json"), b"").unwrap();

        let store = ResultStore::new(Arc::new(FileBackend::new(dir.path())));
        assert_eq!(store.initialize().await, ConnectionState::Ready);
        assert_eq!(
            store.submit(QuizResult::new("q1", 3)).await,
            Some(QuizResult::new("q1", 3))
        );

        let reopened = FileBackend::new(dir.path());
        reopened.open("results").await.unwrap();
        assert_eq!(reopened.scan().await.unwrap(), vec![QuizResult::new("q1", 3)]);
    }

    #[tokio::test]
    async fn corrupt_table_is_a_codec_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("results.json"), b"{not json").unwrap();

        let backend = FileBackend::new(dir.path());
        let err = backend.open("results").await.unwrap_err();
        assert!(matches!(err, BackendError::Codec { .. }));
    }

    #[tokio::test]
    async fn unusable_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let backend = FileBackend::new(blocker.join("db"));
        let err = backend.open("results").await.unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
    }
}
