pub mod youtube;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::VideoId;

pub use youtube::YouTubeTranscripts;

/// One timestamped caption chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    /// Offset from the start of the video, in seconds
    pub start: f64,
    pub duration: f64,
}

/// Captions for a single video, in playback order. Never empty, and blank
/// caption lines are dropped.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language_code: String,
    pub is_generated: bool,
    segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(
        video_id: VideoId,
        language_code: impl Into<String>,
        is_generated: bool,
        mut segments: Vec<TranscriptSegment>,
    ) -> Result<Self, TranscriptError> {
        segments.retain(|s| !s.text.trim().is_empty());
        if segments.is_empty() {
            return Err(TranscriptError::EmptyTranscript(video_id.to_string()));
        }

        Ok(Self {
            video_id,
            language_code: language_code.into(),
            is_generated,
            segments,
        })
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn first_segment(&self) -> &TranscriptSegment {
        // non-empty by construction
        &self.segments[0]
    }

    /// Every segment on its own line.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Invalid video id: {0}")]
    InvalidVideoId(String),
    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),
    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),
    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },
    #[error("Transcript for video {0} is empty")]
    EmptyTranscript(String),
    #[error("Transcript service error: {0}")]
    Upstream(String),
}

impl TranscriptError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            TranscriptError::InvalidVideoId(_) => StatusCode::BAD_REQUEST,
            TranscriptError::VideoUnavailable(_) => StatusCode::NOT_FOUND,
            TranscriptError::TranscriptsDisabled(_)
            | TranscriptError::NoTranscriptFound { .. }
            | TranscriptError::EmptyTranscript(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TranscriptError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, TranscriptError>;
}
