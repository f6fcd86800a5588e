use axum::http::HeaderValue;
use clap::ArgAction::Append;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::analysis::QuizScope;
use crate::llm::openai::DEFAULT_BASE_URL;

/// Main configuration structure that can be loaded from CLI, config file, or environment
///
/// Example configuration file content
/// # yt-analyzer configuration
///
/// # Server configuration
/// host = "0.0.0.0"
/// listen_on_port = 8000
///
/// # LLM configuration (any OpenAI-compatible chat completions endpoint)
/// llm_api_key = "sk-or-..."                       # Prefer OPENROUTER_KEY in the environment
/// llm_base_url = "https://openrouter.ai/api/v1"
/// model = "google/gemini-2.5-flash"
/// request_timeout_secs = 120
///
/// # Transcripts
/// transcript_languages = ["en", "es"]
/// quiz_scope = "first-segment"                    # Options: "first-segment" or "full-transcript"
///
/// # CORS (empty = allow any origin)
/// cors_allow_origins = ["https://example.com"]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[serde(default)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "YT_ANALYZER_HOST", default_value = "0.0.0.0")]
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "YT_ANALYZER_PORT", default_value_t = 8000)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Configuration file path (CLI arguments take precedence)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// API key for the LLM provider
    #[arg(long, env = "OPENROUTER_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub llm_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENROUTER_URL", default_value = DEFAULT_BASE_URL)]
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    /// Model used for analysis and quizzes
    #[arg(short, long, env = "YT_ANALYZER_MODEL", default_value = "google/gemini-2.5-flash")]
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for a single LLM request, in seconds
    #[arg(long, default_value_t = 120)]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Preferred caption languages, in order.
    /// Can be specified multiple times as --transcript-language en --transcript-language es.
    #[arg(long = "transcript-language", action = Append, default_value = "en")]
    #[serde(default = "default_transcript_languages")]
    pub transcript_languages: Vec<String>,

    /// Part of the transcript sent to the quiz prompt
    #[arg(long, value_enum, default_value_t = QuizScope::FirstSegment)]
    pub quiz_scope: QuizScope,

    /// Allowed CORS origins; any origin is allowed when none are given.
    /// Can be specified multiple times.
    #[arg(long = "cors-allow-origin", action = Append)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cors_allow_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            listen_on_port: default_port(),
            config: None,
            llm_api_key: None,
            llm_base_url: default_llm_base_url(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            transcript_languages: default_transcript_languages(),
            quiz_scope: QuizScope::default(),
            cors_allow_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from CLI args, optionally merging with a config file
    pub fn load() -> anyhow::Result<Self> {
        // First parse CLI args
        let mut config = Config::parse();

        // If a config file is specified, load it and merge
        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // Use file config as base, but override with CLI args if they're not default

        // If CLI value is default, use file value
        if self.host == default_host() {
            self.host = file_config.host;
        }
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.llm_base_url == default_llm_base_url() {
            self.llm_base_url = file_config.llm_base_url;
        }
        if self.model == default_model() {
            self.model = file_config.model;
        }
        if self.request_timeout_secs == default_request_timeout_secs() {
            self.request_timeout_secs = file_config.request_timeout_secs;
        }
        if self.transcript_languages == default_transcript_languages() {
            self.transcript_languages = file_config.transcript_languages;
        }
        if self.quiz_scope == QuizScope::default() {
            self.quiz_scope = file_config.quiz_scope;
        }

        // For Option/list fields, CLI takes precedence if set
        if self.llm_api_key.is_none() {
            self.llm_api_key = file_config.llm_api_key;
        }
        if self.cors_allow_origins.is_empty() {
            self.cors_allow_origins = file_config.cors_allow_origins;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self
            .llm_api_key
            .as_ref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(true)
        {
            return Err(anyhow::anyhow!(
                "LLM API key is required (--llm-api-key or OPENROUTER_KEY)"
            ));
        }

        if !self.llm_base_url.starts_with("http://") && !self.llm_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "LLM base URL must start with http:// or https://"
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow::anyhow!("Model name cannot be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be greater than 0"));
        }

        if self.transcript_languages.is_empty() {
            return Err(anyhow::anyhow!(
                "At least one transcript language is required"
            ));
        }
        if self.transcript_languages.iter().any(|l| l.trim().is_empty()) {
            return Err(anyhow::anyhow!("Transcript language codes cannot be blank"));
        }

        for origin in &self.cors_allow_origins {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "CORS origin '{origin}' must start with http:// or https://"
                ));
            }
            if HeaderValue::from_str(origin).is_err() {
                return Err(anyhow::anyhow!("CORS origin '{origin}' is not a valid header value"));
            }
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.listen_on_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_llm_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_transcript_languages() -> Vec<String> {
    vec!["en".to_string()]
}
