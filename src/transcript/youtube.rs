use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::{Transcript, TranscriptError, TranscriptSegment, TranscriptSource};
use crate::VideoId;

/// Fetches captions straight from YouTube.
pub struct YouTubeTranscripts {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl YouTubeTranscripts {
    /// `languages` is in order of preference, e.g. `["en", "es"]`.
    pub fn new(languages: Vec<String>) -> Result<Self, TranscriptError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| TranscriptError::Upstream(e.to_string()))?;

        Ok(Self { api, languages })
    }
}

/// Maps a yt-transcript-rs failure onto the service's transcript errors.
fn classify(error: CouldNotRetrieveTranscript, languages: &[String]) -> TranscriptError {
    use CouldNotRetrieveTranscriptReason as Reason;

    let id = error.video_id.clone();
    match &error.reason {
        Some(Reason::VideoUnavailable { .. }) => TranscriptError::VideoUnavailable(id),
        Some(Reason::InvalidVideoId { .. }) => TranscriptError::InvalidVideoId(id),
        Some(Reason::TranscriptsDisabled { .. }) => TranscriptError::TranscriptsDisabled(id),
        Some(Reason::NoTranscriptFound { .. }) => TranscriptError::NoTranscriptFound {
            video_id: id,
            languages: languages.to_vec(),
        },
        _ => TranscriptError::Upstream(error.to_string()),
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, TranscriptError> {
        let languages = self.languages.iter().map(String::as_str).collect::<Vec<_>>();

        tracing::debug!(%video_id, ?languages, "Fetching transcript");
        let fetched = match self
            .api
            .fetch_transcript(video_id.as_str(), &languages, false)
            .await
        {
            Ok(fetched) => fetched,
            Err(error) => {
                tracing::debug!(%video_id, %error, "Failed to fetch transcript");
                return Err(classify(error, &self.languages));
            }
        };

        tracing::info!(
            %video_id,
            language = %fetched.language_code,
            is_generated = fetched.is_generated,
            snippets = fetched.snippets.len(),
            "Fetched transcript"
        );

        let segments = fetched
            .snippets
            .into_iter()
            .map(|s| TranscriptSegment {
                text: s.text,
                start: s.start,
                duration: s.duration,
            })
            .collect();

        Transcript::new(
            video_id.clone(),
            fetched.language_code,
            fetched.is_generated,
            segments,
        )
    }
}
