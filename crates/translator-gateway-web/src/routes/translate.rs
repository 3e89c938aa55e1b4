//! Translation routes - single text and batch, JSON in and out.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;
use tracing::debug;
use translator_gateway_core::Outcome;

use super::{BatchRequest, NO_TARGET, NO_TEXT, TranslateRequest, non_blank};
use crate::helpers::{JsonResult, json_body, json_error, outcome_response};
use crate::identity::Identity;
use crate::state::AppState;

const TRANSLATION_UNAVAILABLE: &str = "Translation service unavailable";

/// Translate one text.
///
/// Successful translations are recorded under the caller's identity.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    body: Result<Json<TranslateRequest>, JsonRejection>,
) -> JsonResult {
    let request = json_body(body)?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, NO_TEXT));
    }
    let target = non_blank(request.target_lang.as_deref())
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, NO_TARGET))?;

    let outcome = state
        .gateway
        .translate(text, target, request.source_lang.as_deref())
        .await;

    if let Some(payload) = outcome.success() {
        state.record(identity.0, payload);
    }

    Ok(outcome_response(&outcome, TRANSLATION_UNAVAILABLE))
}

/// Translate many texts at once; the response lists one result per input text.
pub async fn translate_batch(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> JsonResult {
    let request = json_body(body)?;

    let target = non_blank(request.target_lang.as_deref())
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, NO_TARGET))?;

    let texts: Vec<String> = request.texts.iter().map(|t| t.trim().to_string()).collect();
    let results = state
        .gateway
        .translate_batch(&texts, target, request.source_lang.as_deref())
        .await;

    let succeeded = results.iter().filter_map(Outcome::success).count();
    debug!("Batch translated {}/{} texts", succeeded, results.len());

    for payload in results.iter().filter_map(Outcome::success) {
        state.record(identity.0.clone(), payload);
    }

    Ok((StatusCode::OK, Json(results)).into_response())
}
