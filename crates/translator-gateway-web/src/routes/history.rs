//! History routes - listing and deleting the caller's translations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use std::sync::Arc;
use tracing::info;
use translator_gateway_core::DeleteOutcome;

use super::HistoryQuery;
use crate::helpers::{ResultExt, RouteResult};
use crate::identity::Identity;
use crate::state::AppState;
use crate::templates::HistoryTemplate;

const TRANSLATION_NOT_FOUND: &str = "Translation not found.";

/// The caller's translations, most recent first.
pub async fn history_page(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<HistoryQuery>,
) -> RouteResult<HistoryTemplate> {
    let owner = identity.require()?;

    let page = state
        .history
        .page(Some(owner), query.page_number(), state.config.history.per_page)
        .or_internal_error()?;

    Ok(HistoryTemplate::from_page(identity.0.clone(), page))
}

/// Delete one of the caller's translations and return to the history page.
///
/// Records owned by someone else are reported exactly like missing ones.
pub async fn delete_translation(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> RouteResult<Redirect> {
    let owner = identity.require()?;

    match state.history.delete(id, owner).or_internal_error()? {
        DeleteOutcome::Deleted => {
            info!("{} deleted translation {}", owner, id);
            Ok(Redirect::to("/history/"))
        }
        DeleteOutcome::NotFound => Err((StatusCode::NOT_FOUND, TRANSLATION_NOT_FOUND.to_string())),
    }
}
