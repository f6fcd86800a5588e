use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::llm::StructuredGenerator;
use crate::models::{QuizResponse, YoutubeAnalysisResponse};
use crate::prompts;
use crate::transcript::{Transcript, TranscriptSource};
use crate::VideoId;

/// How much of the transcript the quiz prompt gets to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QuizScope {
    /// Only the first transcript segment
    #[default]
    FirstSegment,
    /// Every segment, same as the analyzer
    FullTranscript,
}

impl QuizScope {
    fn select(self, transcript: &Transcript) -> String {
        match self {
            QuizScope::FirstSegment => transcript.first_segment().text.clone(),
            QuizScope::FullTranscript => transcript.full_text(),
        }
    }
}

/// Transcript → prompt → structured model output.
#[derive(Clone)]
pub struct Analyzer {
    transcripts: Arc<dyn TranscriptSource>,
    analysis: Arc<dyn StructuredGenerator<YoutubeAnalysisResponse>>,
    quiz: Arc<dyn StructuredGenerator<QuizResponse>>,
    quiz_scope: QuizScope,
}

impl Analyzer {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        analysis: Arc<dyn StructuredGenerator<YoutubeAnalysisResponse>>,
        quiz: Arc<dyn StructuredGenerator<QuizResponse>>,
        quiz_scope: QuizScope,
    ) -> Self {
        Self {
            transcripts,
            analysis,
            quiz,
            quiz_scope,
        }
    }

    pub async fn analyze(&self, video_id: &VideoId) -> Result<YoutubeAnalysisResponse, ApiError> {
        let transcript = self.transcripts.fetch(video_id).await?;
        let prompt = prompts::analyze_prompt(&transcript.full_text());

        info!(%video_id, segments = transcript.segments().len(), "Analyzing transcript");
        Ok(self.analysis.generate(&prompt).await?)
    }

    pub async fn generate_quiz(&self, video_id: &VideoId) -> Result<QuizResponse, ApiError> {
        let transcript = self.transcripts.fetch(video_id).await?;
        let prompt = prompts::quiz_prompt(&self.quiz_scope.select(&transcript));

        info!(%video_id, scope = ?self.quiz_scope, "Generating quiz");
        Ok(self.quiz.generate(&prompt).await?)
    }
}
