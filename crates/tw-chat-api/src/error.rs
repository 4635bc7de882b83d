//! Unified API error type with Axum `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tw_interpreter::TrafficError;

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Core failure, mapped by class.
    #[error(transparent)]
    Traffic(#[from] TrafficError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<&'static str>) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Traffic(err) => {
                let status = match err {
                    TrafficError::Upstream(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.apology(), Some(err.kind()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = self.parts();

        let mut body = json!({
            "error": message,
            "status": status.as_u16(),
        });
        if let Some(kind) = kind {
            body["kind"] = json!(kind);
        }
        if let ApiError::Traffic(TrafficError::InvalidParameter { valid, .. }) = &self {
            body["valid_parameters"] = json!(valid);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
