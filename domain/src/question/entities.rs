//! Question entities

use serde::{Deserialize, Serialize};

/// Maximum number of questions a set may hold.
pub const MAX_QUESTIONS: usize = 50;

/// One quiz item: a prompt, its choices, and the correct answer.
///
/// A record is *well-formed* when it has at least two options and the
/// answer matches one of them exactly. The construction paths (bulk
/// parser, structured validator) guarantee this; data loaded from
/// storage is re-checked via [`QuestionRecord::is_well_formed`] so that
/// corrupted persisted content is detected rather than served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question prompt shown to players.
    pub question: String,
    /// Ordered answer choices. Pairwise distinctness is not enforced.
    pub options: Vec<String>,
    /// The canonical answer. Must equal one of `options`.
    pub answer: String,
}

impl QuestionRecord {
    /// Create a record, checking well-formedness.
    ///
    /// Returns `None` if there are fewer than two options or the answer
    /// is not one of them.
    pub fn try_new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Option<Self> {
        let record = Self {
            question: question.into(),
            options,
            answer: answer.into(),
        };
        record.is_well_formed().then_some(record)
    }

    /// Check the structural invariants: ≥2 options, answer ∈ options.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.options.iter().any(|o| o == &self.answer)
    }
}

/// The full ordered collection of questions currently authoritative.
///
/// Serialized transparently as a bare JSON array, which is also the
/// persisted layout of the durable-file backend. A record's index is its
/// position here; replacing the set reassigns all indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet {
    records: Vec<QuestionRecord>,
}

impl QuestionSet {
    /// Build a set from records in order.
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Positional lookup.
    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.records.get(index)
    }

    /// Read-only view of the records in order.
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Consume and return the inner records.
    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    /// Check every record's structural invariants.
    pub fn is_well_formed(&self) -> bool {
        self.records.iter().all(QuestionRecord::is_well_formed)
    }
}

impl FromIterator<QuestionRecord> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = QuestionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
