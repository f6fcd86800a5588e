pub mod analysis;
pub mod api;
pub mod app_state;
pub mod config;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod transcript;
pub mod video_id;

use axum::Router;
use axum::extract::Extension;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

//
// Re-export
//
pub use analysis::{Analyzer, QuizScope};
pub use api::{ApiError, analyzer, generate_quiz, health, log_request_errors};
pub use app_state::AppState;
pub use config::Config;
pub use llm::{ChatCompletionsClient, LlmError, StructuredGenerator, StructuredOutput};
pub use models::{
    AnswerKey, QuizOptions, QuizQuestion, QuizResponse, YoutubeAnalysisResponse, YoutubeRequest,
};
pub use transcript::{Transcript, TranscriptError, TranscriptSegment, TranscriptSource};
pub use video_id::VideoId;

/// CORS layer: any origin unless an explicit allow-list is configured.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        // origins are checked in Config::validate
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/analyzer", post(analyzer))
        .route("/generate_quiz", post(generate_quiz))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state, cors_layer(&config.cors_allow_origins));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
