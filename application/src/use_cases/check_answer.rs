//! Check answer use case
//!
//! Pure function over one store snapshot: compare a submitted value to
//! the canonical answer at an index. The canonical answer is always
//! returned alongside the verdict — this is a practice tool, not a
//! secured exam, so revealing it on check is intentional.

use crate::ports::question_store::{QuestionStore, StoreError};
use std::sync::Arc;

/// Outcome of an answer check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub correct: bool,
    /// The canonical answer, regardless of verdict.
    pub answer: String,
}

/// Use case for checking a submitted answer
pub struct CheckAnswerUseCase {
    store: Arc<dyn QuestionStore>,
}

impl CheckAnswerUseCase {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Check `selected` against the question at `index`.
    ///
    /// `selected` is expected to already be text-coerced by the caller
    /// (the same normalization the validator applies to options).
    /// Comparison is case-sensitive string equality. An out-of-range
    /// index surfaces as [`StoreError::IndexOutOfRange`], distinct from
    /// a plain wrong answer.
    pub async fn execute(&self, index: i64, selected: &str) -> Result<CheckVerdict, StoreError> {
        let record = self.store.get(index).await?;
        Ok(CheckVerdict {
            correct: selected == record.answer,
            answer: record.answer,
        })
    }
}
