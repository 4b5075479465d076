//! In-memory backend.
//!
//! No persistence: the set lives for the process lifetime only,
//! optionally seeded once at startup from a durable snapshot file if one
//! exists. Same locking shape as the file backend, minus the disk.

use async_trait::async_trait;
use quizcast_application::ports::question_store::{
    QuestionStore, ReplaceReceipt, StoreError, StoreStatus, check_index,
};
use quizcast_domain::{QuestionRecord, QuestionSet, VersionStamp};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

struct Snapshot {
    set: Arc<QuestionSet>,
    version: VersionStamp,
}

/// Process-lifetime question store.
pub struct MemoryQuestionStore {
    state: RwLock<Snapshot>,
    write_gate: Mutex<()>,
}

impl MemoryQuestionStore {
    /// Start empty.
    pub fn new() -> Self {
        Self::with_set(QuestionSet::empty())
    }

    /// Start from an existing set (version stamped at construction).
    pub fn with_set(set: QuestionSet) -> Self {
        let version = if set.is_empty() {
            VersionStamp::ZERO
        } else {
            VersionStamp::now()
        };
        Self {
            state: RwLock::new(Snapshot {
                set: Arc::new(set),
                version,
            }),
            write_gate: Mutex::new(()),
        }
    }

    /// Seed once from a durable snapshot file, if present and readable.
    ///
    /// Unreadable or missing snapshots fall back to an empty set; the
    /// snapshot file is never written back.
    pub async fn seeded_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match tokio::fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice::<QuestionSet>(&bytes) {
                Ok(set) if set.is_well_formed() => {
                    info!(path = %path.display(), count = set.len(), "seeded in-memory store");
                    Self::with_set(set)
                }
                Ok(_) | Err(_) => {
                    warn!(path = %path.display(), "seed snapshot unreadable, starting empty");
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }
}

impl Default for MemoryQuestionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
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
        let count = set.len();

        let mut state = self.state.write().await;
        state.set = Arc::new(set);
        state.version = version;

        Ok(ReplaceReceipt {
            version,
            count,
            // Nothing durable to back up.
            backup_degraded: false,
        })
    }

    async fn current_version(&self) -> Result<VersionStamp, StoreError> {
        Ok(self.state.read().await.version)
    }

    async fn status(&self) -> Result<StoreStatus, StoreError> {
        let state = self.state.read().await;
        Ok(StoreStatus {
            persistent: false,
            version: state.version,
            count: state.set.len(),
        })
    }
}
