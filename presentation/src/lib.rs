//! Presentation layer for quizcast
//!
//! The HTTP boundary: axum routes over the application layer. Public
//! endpoints serve redacted question listings, the answer check, and the
//! live change stream; admin endpoints replace the question set and
//! expose storage introspection. Answer redaction happens here — the
//! store itself always holds full records.

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod stream;

// Re-export commonly used types
pub use auth::AdminGate;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
