pub mod error;
pub mod middleware;
pub mod routes;

// Re-export public types and functions
pub use error::{ApiError, ErrorBody, ErrorContext};
pub use middleware::log_request_errors;
pub use routes::{analyzer, generate_quiz, health};
