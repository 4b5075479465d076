//! Use cases orchestrating domain logic over the store port.

pub mod check_answer;
pub mod replace_questions;
