//! Bulk question grammar.
//!
//! Parses a human-authored text block into question records. The format
//! is line oriented: questions are separated by blank lines, and within
//! a block the first line is the prompt, `|`-prefixed lines are options,
//! and the single `=`-prefixed line is the answer:
//!
//! ```text
//! Which planet is closest to the sun?
//! |Mercury
//! |Venus
//! =Mercury
//! ```
//!
//! Parsing is fail-fast: the first offending block aborts the whole
//! submission, and every error names the 1-based block it came from.

use crate::question::entities::QuestionRecord;
use thiserror::Error;

/// Marker introducing an option line.
pub const OPTION_PREFIX: char = '|';

/// Marker introducing the answer line.
pub const ANSWER_PREFIX: char = '=';

/// Errors produced while parsing bulk question text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("block {block}: a question needs a prompt line plus option and answer lines")]
    MalformedBlock { block: usize },

    #[error("block {block}: at least 2 options are required, found {found}")]
    TooFewOptions { block: usize, found: usize },

    #[error("block {block}: exactly one answer line is required, found {found}")]
    AnswerCountMismatch { block: usize, found: usize },

    #[error("block {block}: answer {answer:?} does not match any option")]
    AnswerNotInOptions { block: usize, answer: String },
}

/// Parse bulk text into question records.
///
/// Pure function over the input: no side effects, no partial results —
/// either every block parses or the first failure is returned.
pub fn parse_bulk(text: &str) -> Result<Vec<QuestionRecord>, ParseError> {
    let mut records = Vec::new();
    for (block_index, block) in split_blocks(text).into_iter().enumerate() {
        records.push(parse_block(block_index + 1, &block)?);
    }
    Ok(records)
}

/// Split input into blocks of non-blank lines, separated by blank lines.
fn split_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parse one block. Checks run in order; the first failure wins.
fn parse_block(block: usize, lines: &[String]) -> Result<QuestionRecord, ParseError> {
    if lines.len() < 2 {
        return Err(ParseError::MalformedBlock { block });
    }

    let question = lines[0].trim().to_string();

    let mut options = Vec::new();
    let mut answers = Vec::new();
    for line in &lines[1..] {
        if let Some(rest) = line.strip_prefix(OPTION_PREFIX) {
            options.push(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(ANSWER_PREFIX) {
            answers.push(rest.trim().to_string());
        }
        // Unmarked continuation lines carry no meaning and are skipped.
    }

    if options.len() < 2 {
        return Err(ParseError::TooFewOptions {
            block,
            found: options.len(),
        });
    }
    if answers.len() != 1 {
        return Err(ParseError::AnswerCountMismatch {
            block,
            found: answers.len(),
        });
    }

    let answer = answers.into_iter().next().unwrap();
    if !options.iter().any(|o| o == &answer) {
        return Err(ParseError::AnswerNotInOptions { block, answer });
    }

    Ok(QuestionRecord {
        question,
        options,
        answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_two_blocks() {
        let records = parse_bulk("Q1\n|A\n|B\n=A\n\nQ2\n|C\n|D\n=D").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "Q1");
        assert_eq!(records[0].options, vec!["A", "B"]);
        assert_eq!(records[0].answer, "A");
        assert_eq!(records[1].question, "Q2");
        assert_eq!(records[1].options, vec!["C", "D"]);
        assert_eq!(records[1].answer, "D");
    }

    #[test]
    fn test_trims_prefixes_and_whitespace() {
        let records = parse_bulk("  What?  \n| first \n|second\n= first ").unwrap();
        assert_eq!(records[0].question, "What?");
        assert_eq!(records[0].options, vec!["first", "second"]);
        assert_eq!(records[0].answer, "first");
    }

    #[test]
    fn test_multiple_blank_lines_between_blocks() {
        let records = parse_bulk("Q1\n|A\n|B\n=B\n\n\n\nQ2\n|C\n|D\n=C").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert_eq!(parse_bulk("").unwrap(), vec![]);
        assert_eq!(parse_bulk("\n\n  \n").unwrap(), vec![]);
    }

    #[test]
    fn test_rejects_lone_question_line() {
        let err = parse_bulk("Just a prompt").unwrap_err();
        assert_eq!(err, ParseError::MalformedBlock { block: 1 });
    }

    #[test]
    fn test_rejects_too_few_options() {
        let err = parse_bulk("Q\n|A\n=A").unwrap_err();
        assert_eq!(err, ParseError::TooFewOptions { block: 1, found: 1 });
    }

    #[test]
    fn test_rejects_missing_answer() {
        let err = parse_bulk("Q\n|A\n|B").unwrap_err();
        assert_eq!(
            err,
            ParseError::AnswerCountMismatch { block: 1, found: 0 }
        );
    }

    #[test]
    fn test_rejects_multiple_answers() {
        let err = parse_bulk("Q\n|A\n|B\n=A\n=B").unwrap_err();
        assert_eq!(
            err,
            ParseError::AnswerCountMismatch { block: 1, found: 2 }
        );
    }

    #[test]
    fn test_rejects_answer_not_in_options() {
        let err = parse_bulk("Q1\n|A\n|B\n=Z").unwrap_err();
        assert_eq!(
            err,
            ParseError::AnswerNotInOptions {
                block: 1,
                answer: "Z".to_string()
            }
        );
    }

    #[test]
    fn test_error_names_offending_block() {
        // First block is fine, second is broken: fail-fast on block 2.
        let err = parse_bulk("Q1\n|A\n|B\n=A\n\nQ2\n|C\n=C").unwrap_err();
        assert_eq!(err, ParseError::TooFewOptions { block: 2, found: 1 });
    }

    #[test]
    fn test_answer_comparison_is_case_sensitive() {
        let err = parse_bulk("Q\n|Apple\n|Pear\n=apple").unwrap_err();
        assert!(matches!(err, ParseError::AnswerNotInOptions { .. }));
    }
}
