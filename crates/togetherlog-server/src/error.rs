//! Maps core errors onto HTTP responses with a `{"error": "..."}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use togetherlog_core::error::TogetherLogError;

#[derive(Debug)]
pub struct AppError(pub TogetherLogError);

impl From<TogetherLogError> for AppError {
    fn from(err: TogetherLogError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(TogetherLogError::Internal(err))
    }
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(TogetherLogError::Unauthorized(message.into()))
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Client-facing message. Database and internal failures are not echoed.
    fn public_message(&self) -> String {
        match &self.0 {
            TogetherLogError::Persistence(_) => "Database error".into(),
            TogetherLogError::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
