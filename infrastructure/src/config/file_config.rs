//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default so a missing file (or a sparse one) still
//! yields a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener settings
    pub server: ServerSection,
    /// Storage backend settings
    pub store: StoreSection,
    /// Admin authorization settings
    pub admin: AdminSection,
    /// Log output settings
    pub log: LogSection,
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds between SSE keep-alive comments on idle streams.
    pub heartbeat_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            heartbeat_secs: 15,
        }
    }
}

/// Which storage backend owns the question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Durable JSON file with backup and quarantine recovery.
    File,
    /// Process-lifetime only, optionally seeded from the file snapshot.
    Memory,
    /// Embedded relational store with transactional replace.
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!(
                "unknown backend {other:?} (expected file, memory, or sqlite)"
            )),
        }
    }
}

/// `[store]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackend,
    /// Directory holding `questions.json` / `questions.db`.
    pub data_dir: PathBuf,
    /// Bound on atomic-write attempts per replace (file backend).
    pub write_retries: u32,
    /// Backoff between write attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            data_dir: PathBuf::from("data"),
            write_retries: 3,
            retry_backoff_ms: 50,
        }
    }
}

impl StoreSection {
    pub fn questions_file(&self) -> PathBuf {
        self.data_dir.join("questions.json")
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join("questions.db")
    }
}

/// `[admin]` section
///
/// Two independent grants: a long-lived token expected in a header, and
/// a per-call password. Either one authorizes a request. Plain string
/// comparison by design — this is not a hardened credential system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub password: String,
    pub token: Option<String>,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            password: "admin".to_string(),
            token: None,
        }
    }
}

/// `[log]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Optional log file; stderr only when unset.
    pub file: Option<PathBuf>,
}
