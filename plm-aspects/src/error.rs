//! Error types for plm-aspects
//!
//! [`AspectError`] is what the engine returns; [`ApiError`] is its HTTP
//! rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Aspect engine errors
#[derive(Debug, Error)]
pub enum AspectError {
    /// Taxonomy fetch failed: network error, non-2xx status, malformed JSON
    /// or no bearer token available
    #[error("Schema fetch failed{}: {message}", status_suffix(.status))]
    SchemaFetch {
        status: Option<u16>,
        message: String,
    },

    /// Structurally invalid input (bad schema, non-string display name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {})", s)).unwrap_or_default()
}

impl AspectError {
    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SchemaFetch {
            status,
            message: message.into(),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream provider failure (502)
    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl From<AspectError> for ApiError {
    fn from(err: AspectError) -> Self {
        match err {
            AspectError::SchemaFetch { status, message } => ApiError::Upstream { status, message },
            AspectError::InvalidArgument(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, upstream_status) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Upstream { status, message } => {
                (StatusCode::BAD_GATEWAY, "SCHEMA_FETCH_ERROR", message, status)
            }
        };

        if status.is_server_error() {
            tracing::warn!(code = error_code, %message, "Request failed");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "upstreamStatus": upstream_status,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_fetch_display_includes_status() {
        let err = AspectError::fetch(Some(404), "category not found");
        assert_eq!(err.to_string(), "Schema fetch failed (status 404): category not found");

        let err = AspectError::fetch(None, "connection refused");
        assert_eq!(err.to_string(), "Schema fetch failed: connection refused");
    }

    #[test]
    fn test_aspect_error_maps_to_api_status() {
        let response = ApiError::from(AspectError::fetch(Some(500), "boom")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response =
            ApiError::from(AspectError::InvalidArgument("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_body_carries_status() {
        use http_body_util::BodyExt;

        let response = ApiError::from(AspectError::fetch(Some(404), "no such category")).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], "SCHEMA_FETCH_ERROR");
        assert_eq!(body["error"]["upstreamStatus"], 404);
        assert_eq!(body["error"]["message"], "no such category");
    }
}
