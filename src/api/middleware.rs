use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};

use super::ErrorContext;

/// Logs every 4xx/5xx response once, with the cause when a handler attached one.
pub async fn log_request_errors(req: Request<Body>, next: Next) -> Response {
    let uri = req.uri().clone();
    let method = req.method().clone();
    let started = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let context = response.extensions().get::<ErrorContext>();
    let code = context.map(|c| c.code).unwrap_or_default();
    let cause = context.map(|c| c.message.as_str()).unwrap_or_default();

    if status.is_client_error() {
        // 4xx error
        warn!(
            method = %method,
            uri = %uri,
            status = %status,
            code,
            cause,
            elapsed_ms,
            "Client error"
        );
    } else if status.is_server_error() {
        // 5xx error
        error!(
            method = %method,
            uri = %uri,
            status = %status,
            code,
            cause,
            elapsed_ms,
            "Server error"
        );
    }

    response
}
