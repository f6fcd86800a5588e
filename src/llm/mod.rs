pub mod openai;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

pub use openai::ChatCompletionsClient;

/// A value the model can be forced to emit through a JSON schema.
pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    /// Name sent as `json_schema.name`; `[a-zA-Z0-9_-]` only.
    const SCHEMA_NAME: &'static str;

    /// Strict JSON schema: every property required, no additional properties.
    fn json_schema() -> serde_json::Value;

    /// Checks the schema cannot express (exact lengths, non-empty strings).
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Schema-constrained generation for a single output type.
#[async_trait]
pub trait StructuredGenerator<T>: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<T, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),
    #[error("Model refused the request: {0}")]
    Refusal(String),
    #[error("No content in model response")]
    EmptyResponse,
    #[error("Model output does not match {schema}: {reason}")]
    Schema {
        schema: &'static str,
        reason: String,
    },
}

impl LlmError {
    /// Whether the upstream is unreachable or overloaded, as opposed to misbehaving.
    pub fn is_unavailable(&self) -> bool {
        match self {
            LlmError::Request(_) => true,
            LlmError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || StatusCode::from_u16(*status)
                        .map(|s| s.is_server_error())
                        .unwrap_or(false)
            }
            LlmError::InvalidResponse(_)
            | LlmError::Refusal(_)
            | LlmError::EmptyResponse
            | LlmError::Schema { .. } => false,
        }
    }
}
