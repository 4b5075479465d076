//! Route table.

use crate::handlers::{
    check_answer, list_questions, question_meta, replace_bulk, replace_structured, storage_status,
};
use crate::state::AppState;
use crate::stream::question_stream;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/questions", get(list_questions))
        .route("/api/questions/meta", get(question_meta))
        .route("/api/questions/stream", get(question_stream))
        .route("/api/check", post(check_answer))
        .route("/api/admin/questions", put(replace_structured))
        .route("/api/admin/questions/bulk", post(replace_bulk))
        .route("/api/admin/storage", get(storage_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
