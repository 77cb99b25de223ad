//! API error type and its JSON rendering

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use hexchess_core::HexChessError;

/// Structured API error that serializes to `{ "error": { "code", "message" } }`
#[derive(Debug)]
pub enum ApiError {
    /// Malformed input: positions, notation, promotion kinds
    InvalidRequest(String),
    NotFound(String),
    /// Well-formed but not allowed by the rules right now
    IllegalMove(String),
    ReplayDesync(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::IllegalMove(msg) => (StatusCode::CONFLICT, "ILLEGAL_MOVE", msg),
            ApiError::ReplayDesync(msg) => (StatusCode::CONFLICT, "REPLAY_DESYNC", msg),
            ApiError::Internal(msg) => {
                tracing::error!(%msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<HexChessError> for ApiError {
    fn from(err: HexChessError) -> Self {
        match &err {
            HexChessError::InvalidPosition(_)
            | HexChessError::InvalidNotation { .. }
            | HexChessError::InvalidPromotion(_)
            | HexChessError::InvalidSetup(_) => ApiError::InvalidRequest(err.to_string()),
            HexChessError::IllegalMove { .. } => ApiError::IllegalMove(err.to_string()),
            HexChessError::ReplayDesync { .. } => ApiError::ReplayDesync(err.to_string()),
            HexChessError::MissingKing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn error_to_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_illegal_move_is_conflict() {
        let err = HexChessError::IllegalMove {
            from: "f5".to_string(),
            to: "f8".to_string(),
            reason: "destination is not a legal move".to_string(),
        };
        let (status, json) = error_to_json(err.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "ILLEGAL_MOVE");
        assert!(json["error"]["message"].as_str().unwrap().contains("f5"));
    }

    #[tokio::test]
    async fn test_bad_notation_is_bad_request() {
        let err = "123".parse::<hexchess_core::Notation>().unwrap_err();
        let (status, json) = error_to_json(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_internal_error() {
        let (status, json) = error_to_json(ApiError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["message"], "boom");
    }
}
