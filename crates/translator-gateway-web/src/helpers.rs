//! Helper types and traits for cleaner route handlers.
//!
//! Provides extension traits for converting `Result` types into
//! HTTP-appropriate error responses, and the JSON error bodies the API
//! endpoints share.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use translator_gateway_core::{FailureKind, Outcome};

/// Standard result type for route handlers returning HTML.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Result type for JSON handlers; the error side is a ready response.
pub type JsonResult = Result<Response, Response>;

pub const INVALID_JSON: &str = "Invalid JSON data";

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Logs the error and converts it to a generic 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| {
            error!("Request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })
    }
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Unwrap a JSON body, answering 400 "Invalid JSON data" when it does not parse.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, INVALID_JSON))
}

/// Map a gateway outcome to a response.
///
/// Successes are 200 and validation/provider failures 400, both with the
/// outcome body. Unexpected failures are 500 with `unavailable` in place of
/// the internal message.
pub fn outcome_response<T: Serialize>(outcome: &Outcome<T>, unavailable: &str) -> Response {
    match outcome.failure().map(|failure| failure.kind) {
        None => (StatusCode::OK, Json(outcome)).into_response(),
        Some(FailureKind::Validation | FailureKind::Provider) => {
            (StatusCode::BAD_REQUEST, Json(outcome)).into_response()
        }
        Some(FailureKind::Unexpected) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, unavailable)
        }
    }
}
