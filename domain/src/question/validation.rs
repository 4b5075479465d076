//! Structured-input validation.
//!
//! The second admin front-end: instead of bulk text, a pre-structured
//! JSON array of `{question, options, answer}` maps. Records arrive
//! loosely typed ([`serde_json::Value`]) and are checked field by field,
//! reporting the 1-based position of the first offending record. Both
//! this path and the bulk parser funnel into the same replace operation.

use crate::question::entities::{MAX_QUESTIONS, QuestionRecord};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while validating a structured question payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("question {position}: missing or empty question text")]
    MissingQuestionText { position: usize },

    #[error("question {position}: options must be a list of at least 2 text entries")]
    InvalidOptions { position: usize },

    #[error("question {position}: answer must be text matching one of the options")]
    InvalidAnswer { position: usize },

    #[error("too many questions: {count} exceeds the limit of {max}")]
    TooManyQuestions { count: usize, max: usize },
}

/// Validate a loosely-typed record array into question records.
pub fn validate_records(raw: &[Value]) -> Result<Vec<QuestionRecord>, ValidationError> {
    let mut records = Vec::with_capacity(raw.len());
    for (i, value) in raw.iter().enumerate() {
        records.push(validate_record(i + 1, value)?);
    }
    if records.len() > MAX_QUESTIONS {
        return Err(ValidationError::TooManyQuestions {
            count: records.len(),
            max: MAX_QUESTIONS,
        });
    }
    Ok(records)
}

fn validate_record(position: usize, value: &Value) -> Result<QuestionRecord, ValidationError> {
    let question = value
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ValidationError::MissingQuestionText { position })?;

    let raw_options = value
        .get("options")
        .and_then(Value::as_array)
        .filter(|opts| opts.len() >= 2)
        .ok_or(ValidationError::InvalidOptions { position })?;

    let mut options = Vec::with_capacity(raw_options.len());
    for option in raw_options {
        options
            .push(coerce_to_text(option).ok_or(ValidationError::InvalidOptions { position })?);
    }

    let answer = value
        .get("answer")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidAnswer { position })?;
    if !options.iter().any(|o| o == answer) {
        return Err(ValidationError::InvalidAnswer { position });
    }

    Ok(QuestionRecord {
        question: question.to_string(),
        options,
        answer: answer.to_string(),
    })
}

/// Text coercion for loosely-typed scalars (strings, numbers, bools).
///
/// This is the same normalization the answer checker applies to a
/// submitted value before comparison, so option membership and answer
/// checking agree on what "equal" means.
pub fn coerce_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_valid_records() {
        let raw = vec![
            json!({"question": "Q1", "options": ["A", "B"], "answer": "A"}),
            json!({"question": "Q2", "options": ["C", "D", "E"], "answer": "E"}),
        ];
        let records = validate_records(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].answer, "E");
    }

    #[test]
    fn test_coerces_numeric_options() {
        let raw = vec![json!({"question": "Pick 2", "options": [1, 2, 3], "answer": "2"})];
        let records = validate_records(&raw).unwrap();
        assert_eq!(records[0].options, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_rejects_missing_question_text() {
        let raw = vec![json!({"options": ["A", "B"], "answer": "A"})];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::MissingQuestionText { position: 1 }
        );
    }

    #[test]
    fn test_rejects_whitespace_only_question() {
        let raw = vec![json!({"question": "   ", "options": ["A", "B"], "answer": "A"})];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::MissingQuestionText { position: 1 }
        );
    }

    #[test]
    fn test_rejects_single_option() {
        let raw = vec![json!({"question": "Q", "options": ["A"], "answer": "A"})];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::InvalidOptions { position: 1 }
        );
    }

    #[test]
    fn test_rejects_non_array_options() {
        let raw = vec![json!({"question": "Q", "options": "A,B", "answer": "A"})];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::InvalidOptions { position: 1 }
        );
    }

    #[test]
    fn test_rejects_answer_outside_options() {
        let raw = vec![json!({"question": "Q", "options": ["A", "B"], "answer": "Z"})];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::InvalidAnswer { position: 1 }
        );
    }

    #[test]
    fn test_reports_first_offending_position() {
        let raw = vec![
            json!({"question": "Q1", "options": ["A", "B"], "answer": "A"}),
            json!({"question": "Q2", "options": ["C", "D"], "answer": "X"}),
        ];
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::InvalidAnswer { position: 2 }
        );
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let raw: Vec<_> = (0..MAX_QUESTIONS + 1)
            .map(|i| json!({"question": format!("Q{i}"), "options": ["A", "B"], "answer": "A"}))
            .collect();
        assert_eq!(
            validate_records(&raw).unwrap_err(),
            ValidationError::TooManyQuestions {
                count: MAX_QUESTIONS + 1,
                max: MAX_QUESTIONS
            }
        );
    }
}
