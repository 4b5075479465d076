//! Request handlers for the JSON endpoints.
//!
//! The change stream lives in [`crate::stream`].

use crate::auth::ADMIN_TOKEN_HEADER;
use crate::dto::{
    BulkTextRequest, CheckRequest, CheckResponse, MetaResponse, PublicQuestion, ReplaceResponse,
    StorageResponse, StructuredReplaceRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{Json, extract::State, http::HeaderMap};
use quizcast_application::{ReplaceInput, ReplaceSummary};

/// `GET /api/questions` — the full set, answers redacted.
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicQuestion>>, ApiError> {
    let set = state.store.list().await?;
    Ok(Json(set.records().iter().map(PublicQuestion::from).collect()))
}

/// `GET /api/questions/meta` — cheap staleness probe.
pub async fn question_meta(State(state): State<AppState>) -> Result<Json<MetaResponse>, ApiError> {
    let mtime = state.store.current_version().await?;
    Ok(Json(MetaResponse { mtime }))
}

/// `POST /api/check` — verdict plus the canonical answer.
pub async fn check_answer(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let verdict = state
        .check_answer
        .execute(request.index(), &request.selected_text())
        .await?;
    Ok(Json(CheckResponse {
        correct: verdict.correct,
        answer: verdict.answer,
    }))
}

/// `POST /api/admin/questions/bulk` — replace from raw bulk text.
pub async fn replace_bulk(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BulkTextRequest>,
) -> Result<Json<ReplaceResponse>, ApiError> {
    require_admin(&state, &headers, request.password.as_deref())?;
    let summary = state
        .replace_questions
        .execute(ReplaceInput::BulkText(request.text))
        .await?;
    Ok(Json(replace_response(summary)))
}

/// `PUT /api/admin/questions` — replace from a structured array.
pub async fn replace_structured(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StructuredReplaceRequest>,
) -> Result<Json<ReplaceResponse>, ApiError> {
    require_admin(&state, &headers, request.password.as_deref())?;
    let summary = state
        .replace_questions
        .execute(ReplaceInput::Structured(request.questions))
        .await?;
    Ok(Json(replace_response(summary)))
}

/// `GET /api/admin/storage` — backend introspection.
pub async fn storage_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StorageResponse>, ApiError> {
    require_admin(&state, &headers, None)?;
    let status = state.store.status().await?;
    Ok(Json(StorageResponse {
        persistent: status.persistent,
        mtime: status.version,
        count: status.count,
    }))
}

fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
    password: Option<&str>,
) -> Result<(), ApiError> {
    let token = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if state.gate.authorize(token, password) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn replace_response(summary: ReplaceSummary) -> ReplaceResponse {
    ReplaceResponse {
        ok: true,
        count: summary.count,
        mtime: summary.version,
        warning: summary
            .backup_degraded
            .then(|| "replace committed without a backup of the prior set".to_string()),
    }
}
