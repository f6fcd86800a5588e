use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmError;
use crate::transcript::TranscriptError;

/// Request-level failures with API error codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Attached to error responses so the request logger can report the cause.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

impl ApiError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Transcript(e) => e.to_status_code(),
            ApiError::Model(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Model(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) | ApiError::Transcript(TranscriptError::InvalidVideoId(_)) => {
                "invalid_input"
            }
            ApiError::Transcript(TranscriptError::VideoUnavailable(_)) => "video_not_found",
            ApiError::Transcript(TranscriptError::Upstream(_)) => "transcript_upstream_error",
            ApiError::Transcript(_) => "transcript_unavailable",
            ApiError::Model(e) if e.is_unavailable() => "upstream_model_unavailable",
            ApiError::Model(_) => "upstream_model_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.to_status_code();
        let code = self.code();

        // upstream internals (provider bodies, page dumps) stay in the logs
        let detail = match &self {
            ApiError::Model(LlmError::Schema { schema, .. }) => {
                format!("Model output did not match {schema}")
            }
            ApiError::Model(_) if status == StatusCode::SERVICE_UNAVAILABLE => {
                "Language model is unavailable, try again later".to_string()
            }
            ApiError::Model(_) => "Language model request failed".to_string(),
            ApiError::Transcript(TranscriptError::Upstream(_)) => {
                "Transcript service request failed".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (
            status,
            Json(ErrorBody {
                error: code.to_string(),
                detail,
            }),
        )
            .into_response();
        response.extensions_mut().insert(ErrorContext {
            code,
            message: self.to_string(),
        });
        response
    }
}
