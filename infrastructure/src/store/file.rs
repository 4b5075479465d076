//! Durable-file backend.
//!
//! The authoritative copy lives in process memory and is mirrored to a
//! JSON file (a bare array of records). Every replace follows the same
//! discipline:
//!
//! 1. best-effort copy of the current file to its backup sibling
//!    (failure downgrades to a warning, never an abort);
//! 2. write the new content to a temp file in the same directory, force
//!    it to stable storage, then atomically rename over the target —
//!    the target file is, at every observable instant, either the old
//!    complete content or the new complete content;
//! 3. swap the in-memory snapshot and advance the version stamp.
//!
//! The temp-write/rename step is retried a bounded number of times with
//! backoff for transient failures (e.g. the target briefly held by
//! another process). On startup a missing file is initialized empty; an
//! unparsable one is archived under a timestamped quarantine name and
//! the live file reset to empty — availability over unreadable bytes,
//! but never a silent discard.

use async_trait::async_trait;
use quizcast_application::ports::question_store::{
    QuestionStore, ReplaceReceipt, StoreError, StoreStatus, check_index,
};
use quizcast_domain::{QuestionRecord, QuestionSet, VersionStamp};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Default bound on atomic-write attempts per replace.
pub const DEFAULT_WRITE_RETRIES: u32 = 3;

/// Default backoff between write attempts (scaled linearly per attempt).
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(50);

struct Snapshot {
    set: Arc<QuestionSet>,
    version: VersionStamp,
}

/// File-backed question store.
pub struct FileQuestionStore {
    path: PathBuf,
    backup_path: PathBuf,
    tmp_path: PathBuf,
    write_retries: u32,
    retry_backoff: Duration,
    state: RwLock<Snapshot>,
    /// Serializes replaces; readers go through `state` only.
    write_gate: Mutex<()>,
}

impl FileQuestionStore {
    /// Open (or initialize) the store at `path` with default retry policy.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_retry(path, DEFAULT_WRITE_RETRIES, DEFAULT_RETRY_BACKOFF).await
    }

    /// Open with an explicit persistence retry policy.
    pub async fn open_with_retry(
        path: impl Into<PathBuf>,
        write_retries: u32,
        retry_backoff: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence(&path, "creating data directory", e))?;
        }

        let store = Self {
            backup_path: sibling(&path, ".bak"),
            tmp_path: sibling(&path, ".tmp"),
            path,
            write_retries: write_retries.max(1),
            retry_backoff,
            state: RwLock::new(Snapshot {
                set: Arc::new(QuestionSet::empty()),
                version: VersionStamp::ZERO,
            }),
            write_gate: Mutex::new(()),
        };
        store.load_or_recover().await?;
        Ok(store)
    }

    /// Path of the live file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Initial load with corruption recovery.
    async fn load_or_recover(&self) -> Result<(), StoreError> {
        let (set, version) = match tokio::fs::read(&self.path).await {
            Ok(bytes) => match decode_set(&bytes) {
                Ok(set) => {
                    let version = self.file_version().await;
                    info!(
                        path = %self.path.display(),
                        count = set.len(),
                        version = %version,
                        "loaded question set"
                    );
                    (set, version)
                }
                Err(reason) => {
                    self.quarantine(&reason).await?;
                    self.write_atomic(b"[]").await?;
                    (QuestionSet::empty(), VersionStamp::now())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no question file, initializing empty set");
                self.write_atomic(b"[]").await?;
                (QuestionSet::empty(), VersionStamp::now())
            }
            Err(e) => return Err(persistence(&self.path, "reading", e)),
        };

        let mut state = self.state.write().await;
        state.set = Arc::new(set);
        state.version = version;
        Ok(())
    }

    /// Archive the unreadable live file under a timestamped name.
    async fn quarantine(&self, reason: &str) -> Result<(), StoreError> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%3f");
        let quarantine_path = sibling(&self.path, &format!(".corrupt-{stamp}"));
        warn!(
            path = %self.path.display(),
            quarantine = %quarantine_path.display(),
            reason,
            "question file unreadable, quarantining and resetting to empty"
        );
        tokio::fs::rename(&self.path, &quarantine_path)
            .await
            .map_err(|e| persistence(&self.path, "quarantining corrupt file", e))
    }

    /// Version stamp derived from the live file's mtime.
    async fn file_version(&self) -> VersionStamp {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| VersionStamp::from_millis(d.as_millis() as u64))
                .unwrap_or_else(VersionStamp::now),
            Err(_) => VersionStamp::now(),
        }
    }

    /// Temp-write, fsync, rename — bounded retries on transient failure.
    async fn write_atomic(&self, payload: &[u8]) -> Result<(), StoreError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_write_atomic(payload).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.write_retries => {
                    warn!(
                        path = %self.path.display(),
                        attempt,
                        error = %e,
                        "atomic write failed, retrying"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => {
                    return Err(StoreError::Persistence(format!(
                        "writing {} failed after {attempt} attempts: {e}",
                        self.path.display()
                    )));
                }
            }
        }
    }

    async fn try_write_atomic(&self, payload: &[u8]) -> io::Result<()> {
        let mut file = tokio::fs::File::create(&self.tmp_path).await?;
        file.write_all(payload).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&self.tmp_path, &self.path).await
    }
}

#[async_trait]
impl QuestionStore for FileQuestionStore {
    async fn list(&self) -> Result<QuestionSet, StoreError> {
        Ok(self.state.read().await.set.as_ref().clone())
    }

    async fn get(&self, index: i64) -> Result<QuestionRecord, StoreError> {
        let state = self.state.read().await;
        let i = check_index(index, state.set.len())?;
        Ok(state.set.get(i).cloned().unwrap())
    }

    async fn replace(&self, records: Vec<QuestionRecord>) -> Result<ReplaceReceipt, StoreError> {
        let _gate = self.write_gate.lock().await;

        let prev = self.state.read().await.version;
        let version = VersionStamp::next_after(prev);
        let set = QuestionSet::new(records);
        let payload = serde_json::to_vec_pretty(&set)
            .map_err(|e| StoreError::Persistence(format!("encoding question set: {e}")))?;

        // Backup is best effort: losing it degrades recovery, not service.
        let backup_degraded = match tokio::fs::copy(&self.path, &self.backup_path).await {
            Ok(_) => false,
            Err(e) => {
                warn!(
                    backup = %self.backup_path.display(),
                    error = %e,
                    "pre-replace backup failed, continuing without it"
                );
                true
            }
        };

        // If this fails the prior file and snapshot stay authoritative.
        self.write_atomic(&payload).await?;

        let count = set.len();
        let mut state = self.state.write().await;
        state.set = Arc::new(set);
        state.version = version;

        Ok(ReplaceReceipt {
            version,
            count,
            backup_degraded,
        })
    }

    async fn current_version(&self) -> Result<VersionStamp, StoreError> {
        Ok(self.state.read().await.version)
    }

    async fn status(&self) -> Result<StoreStatus, StoreError> {
        let state = self.state.read().await;
        Ok(StoreStatus {
            persistent: true,
            version: state.version,
            count: state.set.len(),
        })
    }
}

/// Decode persisted bytes, treating ill-formed records as corruption.
fn decode_set(bytes: &[u8]) -> Result<QuestionSet, String> {
    let set: QuestionSet =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    if !set.is_well_formed() {
        return Err("record violates question invariants".to_string());
    }
    Ok(set)
}

/// Sibling path with a suffix appended to the file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn persistence(path: &Path, action: &str, e: io::Error) -> StoreError {
    StoreError::Persistence(format!("{action} {}: {e}", path.display()))
}
