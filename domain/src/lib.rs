//! Domain layer for quizcast
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Question set
//!
//! The authoritative data is a single ordered sequence of
//! [`QuestionRecord`]s. A record's public identity is its position in the
//! sequence, assigned at replace time; there are no persistent per-record
//! ids. The whole set is replaced atomically, never mutated row by row.
//!
//! ## Version stamps
//!
//! Every committed set carries a [`VersionStamp`], a monotonically
//! increasing marker used by clients purely for staleness detection.
//!
//! ## Two admin front-ends, one contract
//!
//! Administrators can submit either raw bulk text (parsed by
//! [`bulk_parser`]) or a pre-structured array (checked by [`validation`]).
//! Both funnel into the same downstream replace operation.

pub mod question;

// Re-export commonly used types
pub use question::{
    bulk_parser::{ANSWER_PREFIX, OPTION_PREFIX, ParseError, parse_bulk},
    entities::{MAX_QUESTIONS, QuestionRecord, QuestionSet},
    validation::{ValidationError, validate_records},
    value_objects::{ChangeEvent, VersionStamp},
};
