//! Page routes - full HTML page renders.

use axum::extract::State;
use std::sync::Arc;

use crate::identity::Identity;
use crate::state::AppState;
use crate::templates::{HomeTemplate, LanguagesTemplate};

/// Home page with the translation form.
pub async fn index(State(state): State<Arc<AppState>>, identity: Identity) -> HomeTemplate {
    HomeTemplate::new(identity.0, state.display_languages().await)
}

/// Table of supported languages.
pub async fn languages_page(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> LanguagesTemplate {
    LanguagesTemplate {
        user: identity.0,
        languages: state.display_languages().await,
    }
}
