//! Request/response shapes for the HTTP boundary.

use quizcast_domain::{QuestionRecord, VersionStamp, question::validation::coerce_to_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A question as exposed to players: the answer is never present.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&QuestionRecord> for PublicQuestion {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            question: record.question.clone(),
            options: record.options.clone(),
        }
    }
}

/// Staleness probe: the current version stamp only.
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub mtime: VersionStamp,
}

/// Body of `POST /api/check`.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub index: Option<i64>,
    pub selected: Option<Value>,
}

impl CheckRequest {
    /// Missing index behaves like an out-of-range one.
    pub fn index(&self) -> i64 {
        self.index.unwrap_or(-1)
    }

    /// Text-normalized submitted value (numbers and bools compare as
    /// their text form, anything else as empty).
    pub fn selected_text(&self) -> String {
        self.selected
            .as_ref()
            .and_then(coerce_to_text)
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub correct: bool,
    pub answer: String,
}

/// Body of the raw-text admin replace.
#[derive(Debug, Deserialize)]
pub struct BulkTextRequest {
    pub text: String,
    pub password: Option<String>,
}

/// Body of the structured admin replace.
#[derive(Debug, Deserialize)]
pub struct StructuredReplaceRequest {
    pub questions: Vec<Value>,
    pub password: Option<String>,
}

/// Success shape shared by both replace endpoints.
#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub ok: bool,
    pub count: usize,
    pub mtime: VersionStamp,
    /// Present when the replace succeeded in degraded mode (no backup).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `GET /api/admin/storage`.
#[derive(Debug, Serialize)]
pub struct StorageResponse {
    pub persistent: bool,
    pub mtime: VersionStamp,
    pub count: usize,
}

/// One message on the change stream.
#[derive(Debug, Serialize)]
pub struct ChangeMessage {
    pub event: &'static str,
    pub mtime: VersionStamp,
}

impl ChangeMessage {
    pub fn questions_updated(mtime: VersionStamp) -> Self {
        Self {
            event: "questions_updated",
            mtime,
        }
    }
}
