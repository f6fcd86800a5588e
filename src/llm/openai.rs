use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{LlmError, StructuredGenerator, StructuredOutput};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for any OpenAI-compatible `/chat/completions` endpoint (OpenRouter, OpenAI, ...)
/// that supports `response_format: json_schema`.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn send_completion_request(
        &self,
        user_content: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<CompletionResponse, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": user_content
                }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "strict": true,
                    "schema": schema
                }
            }
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let text = resp.text().await?;
        parse_completion(&text)
    }
}

/// Decodes a 2xx completion body. Providers sometimes answer 200 with an
/// `{"error": {...}}` envelope or an HTML page instead of a completion.
fn parse_completion(text: &str) -> Result<CompletionResponse, LlmError> {
    serde_json::from_str::<CompletionResponse>(text).map_err(|e| {
        let reason = serde_json::from_str::<ErrorEnvelope>(text)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| e.to_string());
        LlmError::InvalidResponse(reason)
    })
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: u32,
    pub message: CompletionMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

/// Removes one surrounding Markdown code fence (```json ... ```), which some
/// providers add even in structured output mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // drop the info string (e.g. `json`) on the opening line
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

/// Decodes and validates the content of a structured completion.
pub fn decode_structured<T: StructuredOutput>(content: &str) -> Result<T, LlmError> {
    let value = serde_json::from_str::<T>(strip_code_fence(content)).map_err(|e| {
        LlmError::Schema {
            schema: T::SCHEMA_NAME,
            reason: e.to_string(),
        }
    })?;

    value.validate().map_err(|reason| LlmError::Schema {
        schema: T::SCHEMA_NAME,
        reason,
    })?;

    Ok(value)
}

#[async_trait]
impl<T: StructuredOutput> StructuredGenerator<T> for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<T, LlmError> {
        let response = self
            .send_completion_request(prompt, T::SCHEMA_NAME, T::json_schema())
            .await?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(LlmError::EmptyResponse)?;

        if let Some(refusal) = message.refusal {
            return Err(LlmError::Refusal(refusal));
        }

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(
            schema = T::SCHEMA_NAME,
            model = %self.model,
            bytes = content.len(),
            "Received structured completion"
        );

        decode_structured(&content)
    }
}
