//! Application layer for quizcast
//!
//! This crate contains use cases, the question-store port, and the change
//! notifier. It depends only on the domain layer.

pub mod notify;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use notify::{ChangeListener, ChangeNotifier};
pub use ports::question_store::{QuestionStore, ReplaceReceipt, StoreError, StoreStatus};
pub use use_cases::check_answer::{CheckAnswerUseCase, CheckVerdict};
pub use use_cases::replace_questions::{
    ReplaceError, ReplaceInput, ReplaceQuestionsUseCase, ReplaceSummary,
};
