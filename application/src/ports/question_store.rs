//! Question store port
//!
//! Defines the interface every storage backend implements. Backend choice
//! (durable file, in-memory, embedded SQL) is a deployment decision, not
//! a behavioral one: all backends satisfy the same contract.
//!
//! # Contract
//!
//! - `list`, `get`, and `current_version` are reads. They may run fully
//!   concurrently and always observe a self-consistent snapshot — either
//!   the set before an in-flight replace or the set after it, never a
//!   mixture, and never an error caused by the concurrency itself.
//! - `replace` is the only write. At most one replace runs at a time per
//!   store instance; concurrent calls serialize and the later one wins
//!   with a strictly greater version stamp. Replacement is all-or-nothing:
//!   if persistence fails, the previously committed set stays
//!   authoritative in memory and on disk.

use async_trait::async_trait;
use quizcast_domain::{QuestionRecord, QuestionSet, VersionStamp};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("index {index} out of range for {size} questions")]
    IndexOutOfRange { index: i64, size: usize },

    #[error("persistence failed: {0}")]
    Persistence(String),
}

/// Result of a successful replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceReceipt {
    /// The stamp assigned to the newly committed set.
    pub version: VersionStamp,
    /// Number of questions in the committed set.
    pub count: usize,
    /// True when the pre-replace backup could not be taken. The replace
    /// itself succeeded; this is surfaced to admins as a warning.
    pub backup_degraded: bool,
}

/// Operational snapshot of a store for introspection endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatus {
    /// Whether the backend survives a process restart.
    pub persistent: bool,
    /// Stamp of the currently authoritative set.
    pub version: VersionStamp,
    /// Number of questions currently held.
    pub count: usize,
}

/// Authoritative owner of the question set.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Snapshot of the full ordered set.
    async fn list(&self) -> Result<QuestionSet, StoreError>;

    /// Positional lookup. Negative or past-the-end indices yield
    /// [`StoreError::IndexOutOfRange`].
    async fn get(&self, index: i64) -> Result<QuestionRecord, StoreError>;

    /// Atomically swap the entire set, assign positions by order,
    /// persist, and advance the version stamp.
    async fn replace(&self, records: Vec<QuestionRecord>) -> Result<ReplaceReceipt, StoreError>;

    /// Stamp of the currently authoritative set.
    async fn current_version(&self) -> Result<VersionStamp, StoreError>;

    /// Operational status for introspection.
    async fn status(&self) -> Result<StoreStatus, StoreError>;
}

/// Bounds-check an incoming index against a set size.
///
/// Shared by backends so every one of them rejects the same range the
/// same way.
pub fn check_index(index: i64, size: usize) -> Result<usize, StoreError> {
    if index < 0 || index as u64 >= size as u64 {
        return Err(StoreError::IndexOutOfRange { index, size });
    }
    Ok(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index_accepts_in_range() {
        assert_eq!(check_index(0, 3).unwrap(), 0);
        assert_eq!(check_index(2, 3).unwrap(), 2);
    }

    #[test]
    fn test_check_index_rejects_negative() {
        assert!(matches!(
            check_index(-1, 3),
            Err(StoreError::IndexOutOfRange { index: -1, size: 3 })
        ));
    }

    #[test]
    fn test_check_index_rejects_past_end() {
        assert!(matches!(
            check_index(3, 3),
            Err(StoreError::IndexOutOfRange { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_check_index_rejects_on_empty() {
        assert!(check_index(0, 0).is_err());
    }
}
