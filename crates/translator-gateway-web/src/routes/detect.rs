//! Language detection route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;

use super::{DetectRequest, NO_TEXT};
use crate::helpers::{JsonResult, json_body, json_error, outcome_response};
use crate::state::AppState;

const DETECTION_UNAVAILABLE: &str = "Language detection failed";

pub async fn detect(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DetectRequest>, JsonRejection>,
) -> JsonResult {
    let request = json_body(body)?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, NO_TEXT));
    }

    let outcome = state.gateway.detect_language(text).await;
    Ok(outcome_response(&outcome, DETECTION_UNAVAILABLE))
}
