use std::sync::Arc;

use tracing::info;

use crate::analysis::Analyzer;
use crate::llm::ChatCompletionsClient;
use crate::transcript::YouTubeTranscripts;
use crate::Config;

/// Immutable per-process state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    /// Builds the production clients: one LLM client shared by both endpoints
    /// and one YouTube transcript fetcher.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .llm_api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("LLM API key is not configured"))?;

        let llm = Arc::new(
            ChatCompletionsClient::new(api_key, &config.model)
                .with_base_url(&config.llm_base_url)
                .with_timeout(config.request_timeout())?,
        );
        let transcripts = Arc::new(YouTubeTranscripts::new(config.transcript_languages.clone())?);

        info!(
            model = %config.model,
            base_url = %config.llm_base_url,
            languages = ?config.transcript_languages,
            quiz_scope = ?config.quiz_scope,
            "Clients initialized"
        );

        let analyzer = Analyzer::new(transcripts, llm.clone(), llm, config.quiz_scope);
        Ok(Self::new(analyzer))
    }
}
