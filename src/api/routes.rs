use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::models::{QuizResponse, YoutubeAnalysisResponse, YoutubeRequest};
use crate::{AppState, VideoId};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Turns the request body into a video id before anything leaves the process.
fn parse_request(payload: Result<Json<YoutubeRequest>, JsonRejection>) -> Result<VideoId, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;

    VideoId::from_url(&request.url).ok_or_else(|| {
        ApiError::InvalidInput(format!("'{}' is not a valid YouTube video URL", request.url))
    })
}

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

#[axum::debug_handler]
pub async fn analyzer(
    Extension(state): Extension<AppState>,
    payload: Result<Json<YoutubeRequest>, JsonRejection>,
) -> Result<Json<YoutubeAnalysisResponse>, ApiError> {
    let video_id = parse_request(payload)?;
    info!(%video_id, "Analysis requested");

    let analysis = state.analyzer.analyze(&video_id).await?;
    Ok(Json(analysis))
}

#[axum::debug_handler]
pub async fn generate_quiz(
    Extension(state): Extension<AppState>,
    payload: Result<Json<YoutubeRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let video_id = parse_request(payload)?;
    info!(%video_id, "Quiz requested");

    let quiz = state.analyzer.generate_quiz(&video_id).await?;
    Ok(Json(quiz))
}
