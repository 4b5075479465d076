//! Replace questions use case
//!
//! Orchestrates the full admin replace flow: parse or validate the
//! submitted payload, swap the authoritative set through the store, and
//! announce the new version to subscribers. The two admin front-ends
//! (raw bulk text and a structured array) are alternative inputs to this
//! one contract.

use crate::notify::ChangeNotifier;
use crate::ports::question_store::{QuestionStore, StoreError};
use quizcast_domain::{
    MAX_QUESTIONS, ParseError, ValidationError, VersionStamp, parse_bulk, validate_records,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a replace submission
#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for the ReplaceQuestions use case
#[derive(Debug, Clone)]
pub enum ReplaceInput {
    /// Raw bulk text in the line-oriented question grammar.
    BulkText(String),
    /// Pre-structured array of loosely-typed question maps.
    Structured(Vec<serde_json::Value>),
}

/// Outcome reported back to the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub count: usize,
    pub version: VersionStamp,
    /// The pre-replace backup could not be taken (warning, not failure).
    pub backup_degraded: bool,
}

/// Use case for replacing the authoritative question set
pub struct ReplaceQuestionsUseCase {
    store: Arc<dyn QuestionStore>,
    notifier: Arc<ChangeNotifier>,
}

impl ReplaceQuestionsUseCase {
    pub fn new(store: Arc<dyn QuestionStore>, notifier: Arc<ChangeNotifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn execute(&self, input: ReplaceInput) -> Result<ReplaceSummary, ReplaceError> {
        let records = match input {
            ReplaceInput::BulkText(text) => {
                let records = parse_bulk(&text)?;
                // The structured path enforces the cap inside validation;
                // the text grammar has no aggregate rule, so apply the
                // same limit here.
                if records.len() > MAX_QUESTIONS {
                    return Err(ValidationError::TooManyQuestions {
                        count: records.len(),
                        max: MAX_QUESTIONS,
                    }
                    .into());
                }
                records
            }
            ReplaceInput::Structured(raw) => validate_records(&raw)?,
        };

        let receipt = self.store.replace(records).await?;
        if receipt.backup_degraded {
            warn!(version = %receipt.version, "replace committed but backup was not taken");
        }

        self.notifier.publish(receipt.version);
        info!(
            count = receipt.count,
            version = %receipt.version,
            "question set replaced"
        );

        Ok(ReplaceSummary {
            count: receipt.count,
            version: receipt.version,
            backup_degraded: receipt.backup_degraded,
        })
    }
}
