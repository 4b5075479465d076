//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quizcast_application::{ReplaceError, StoreError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP clients as `{"error": "<reason>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or rejected input, with the violated rule spelled out.
    #[error("{0}")]
    BadRequest(String),

    /// Index outside `[0, size)` — distinct from a wrong answer.
    #[error("invalid index")]
    InvalidIndex,

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::InvalidIndex => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(detail) => {
                // Log the detail, keep the response body generic.
                error!(detail = %detail, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IndexOutOfRange { .. } => ApiError::InvalidIndex,
            StoreError::Persistence(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<ReplaceError> for ApiError {
    fn from(err: ReplaceError) -> Self {
        match err {
            ReplaceError::Parse(e) => ApiError::BadRequest(e.to_string()),
            ReplaceError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ReplaceError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizcast_domain::ParseError;

    #[test]
    fn test_index_error_maps_to_bad_request() {
        let api: ApiError = StoreError::IndexOutOfRange { index: -1, size: 3 }.into();
        assert!(matches!(api, ApiError::InvalidIndex));
    }

    #[test]
    fn test_parse_error_names_violated_rule() {
        let api: ApiError =
            ReplaceError::Parse(ParseError::TooFewOptions { block: 2, found: 1 }).into();
        let ApiError::BadRequest(message) = api else {
            panic!("expected BadRequest");
        };
        assert!(message.contains("block 2"));
        assert!(message.contains("options"));
    }

    #[test]
    fn test_persistence_error_is_internal() {
        let api: ApiError = StoreError::Persistence("disk gone".to_string()).into();
        assert!(matches!(api, ApiError::Internal(_)));
        // Client-visible text stays generic.
        assert_eq!(api.to_string(), "internal error");
    }
}
