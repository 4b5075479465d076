//! Storage backends implementing the [`QuestionStore`] port.
//!
//! All three backends satisfy the same external contract; which one runs
//! is a deployment decision made at construction time.
//!
//! [`QuestionStore`]: quizcast_application::QuestionStore

pub mod file;
pub mod memory;
pub mod sqlite;
