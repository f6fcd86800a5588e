#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use serde_json::{Value as JsonValue, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use yt_analyzer::{
    Analyzer, AppState, ChatCompletionsClient, QuizScope, Transcript, TranscriptError,
    TranscriptSegment, TranscriptSource, VideoId,
};

pub const API_KEY: &str = "sk-test";
pub const MODEL: &str = "google/gemini-2.5-flash";

/// Video with a three segment transcript
pub const VIDEO_OK: &str = "abc123def45";
/// Shorter id with the same three segment transcript
pub const VIDEO_SHORT_ID: &str = "abc123";
/// Video whose captions are disabled
pub const VIDEO_NO_CAPTIONS: &str = "noCaptions1";
/// Video that does not exist
pub const VIDEO_MISSING: &str = "missingVid1";

pub const SEGMENTS: [&str; 3] = [
    "welcome to the borrow checker deep dive",
    "lifetimes describe how long references live",
    "finally we look at interior mutability",
];

pub fn watch_url(video_id: &str) -> String {
    format!("https://youtube.com/watch?v={video_id}")
}

/// Transcript source with canned answers per video id.
#[derive(Default)]
pub struct MockTranscripts {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TranscriptSource for MockTranscripts {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, TranscriptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match video_id.as_str() {
            VIDEO_OK | VIDEO_SHORT_ID => {
                let segments = SEGMENTS
                    .iter()
                    .enumerate()
                    .map(|(i, text)| TranscriptSegment {
                        text: text.to_string(),
                        start: i as f64 * 4.0,
                        duration: 4.0,
                    })
                    .collect();
                Transcript::new(video_id.clone(), "en", true, segments)
            }
            VIDEO_NO_CAPTIONS => Err(TranscriptError::TranscriptsDisabled(video_id.to_string())),
            _ => Err(TranscriptError::VideoUnavailable(video_id.to_string())),
        }
    }
}

pub fn analysis_json() -> JsonValue {
    json!({
        "main_topics": ["borrow checker", "lifetimes", "interior mutability"],
        "summary": "A walk through Rust's ownership rules.",
        "recommended_audience": "Rust beginners"
    })
}

pub fn quiz_json(count: usize) -> JsonValue {
    let keys = ["A", "B", "C", "D"];
    let questions = (0..count)
        .map(|i| {
            json!({
                "question": format!("Question {}?", i + 1),
                "options": { "A": "alpha", "B": "beta", "C": "gamma", "D": "delta" },
                "correct_answer": keys[i % 4]
            })
        })
        .collect::<Vec<_>>();
    json!({ "questions": questions })
}

/// How the mock LLM answers.
#[derive(Clone)]
pub enum MockReply {
    /// Valid output for whichever schema was requested
    Valid,
    /// Fixed assistant content
    Content(String),
    /// Refusal instead of content
    Refusal(String),
    /// Non-success status with a body
    Status(u16, String),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: JsonValue,
}

impl RecordedRequest {
    pub fn prompt(&self) -> &str {
        self.body["messages"][0]["content"].as_str().unwrap_or_default()
    }

    pub fn schema_name(&self) -> &str {
        self.body["response_format"]["json_schema"]["name"]
            .as_str()
            .unwrap_or_default()
    }
}

struct MockLlmState {
    reply: MockReply,
    received: Mutex<Vec<RecordedRequest>>,
}

/// Mock OpenAI-compatible `/chat/completions` server
pub struct MockLlm {
    server_handle: JoinHandle<()>,
    pub port: u16,
    state: Arc<MockLlmState>,
}

impl MockLlm {
    pub async fn start(reply: MockReply) -> Self {
        let port = portpicker::pick_unused_port().expect("No available port for mock llm");
        let state = Arc::new(MockLlmState {
            reply,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(state.clone());

        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind mock llm");
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockLlm {
            server_handle,
            port,
            state,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/v1", self.port)
    }

    pub fn client(&self) -> ChatCompletionsClient {
        ChatCompletionsClient::new(API_KEY, MODEL)
            .with_base_url(self.base_url())
            .with_timeout(Duration::from_secs(5))
            .unwrap()
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.received.lock().await.clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

async fn completions(
    State(state): State<Arc<MockLlmState>>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    let recorded = RecordedRequest {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    let schema = recorded.schema_name().to_string();
    state.received.lock().await.push(recorded);

    let message = match &state.reply {
        MockReply::Valid => {
            let content = match schema.as_str() {
                "quiz_response" => quiz_json(10),
                _ => analysis_json(),
            };
            json!({ "role": "assistant", "content": content.to_string() })
        }
        MockReply::Content(content) => json!({ "role": "assistant", "content": content }),
        MockReply::Refusal(reason) => {
            json!({ "role": "assistant", "content": null, "refusal": reason })
        }
        MockReply::Status(status, body) => {
            let status = StatusCode::from_u16(*status).unwrap();
            return (status, body.clone()).into_response();
        }
    };

    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": MODEL,
        "choices": [
            { "index": 0, "message": message, "finish_reason": "stop" }
        ]
    }))
    .into_response()
}

/// Test harness that runs the API in-process against mocks
pub struct TestServer {
    handle: JoinHandle<()>,
    pub port: u16,
    pub transcripts: Arc<MockTranscripts>,
    pub llm: MockLlm,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start(reply: MockReply) -> Self {
        Self::start_with(reply, QuizScope::FirstSegment, &[]).await
    }

    pub async fn start_with(reply: MockReply, quiz_scope: QuizScope, cors: &[String]) -> Self {
        let llm = MockLlm::start(reply).await;
        let transcripts = Arc::new(MockTranscripts::default());
        let generator = Arc::new(llm.client());

        let analyzer = Analyzer::new(transcripts.clone(), generator.clone(), generator, quiz_scope);
        let app = yt_analyzer::router(AppState::new(analyzer), yt_analyzer::cors_layer(cors));

        // Find an available port
        let port = portpicker::pick_unused_port().expect("No available port");
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind test server");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        TestServer {
            handle,
            port,
            transcripts,
            llm,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn post_url(&self, path: &str, video_url: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&json!({ "url": video_url }))
            .send()
            .await
            .unwrap()
    }

    pub fn transcript_calls(&self) -> usize {
        self.transcripts.calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
