//! Error types for contacts-web
//!
//! Every failure leaves a handler as a JSON body
//! `{"error": {"code": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contacts_common::Error as CommonError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// contacts-common error
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, conflicting_id) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Common(CommonError::Conflict { conflicting_id }) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                CommonError::Conflict { conflicting_id }.to_string(),
                Some(conflicting_id),
            ),
            ApiError::Common(CommonError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None)
            }
            ApiError::Common(err) => {
                error!("Storage failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    err.to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let Some(id) = conflicting_id {
            error["conflicting_id"] = json!(id);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Convenience type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("contact 3".into()), StatusCode::NOT_FOUND),
            (
                ApiError::Common(CommonError::Conflict { conflicting_id: 1 }),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Common(CommonError::InvalidInput("blank".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Common(CommonError::Database(sqlx::Error::PoolClosed)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
