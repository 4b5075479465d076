//! Infrastructure layer for quizcast
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer — the three storage backends — plus configuration
//! file loading.

pub mod config;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, StoreBackend};
pub use store::{
    file::FileQuestionStore, memory::MemoryQuestionStore, sqlite::SqliteQuestionStore,
};
