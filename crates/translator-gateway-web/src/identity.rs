//! Caller identity supplied by the fronting proxy.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::helpers::RouteResult;

/// Header set by the trusted upstream after authentication.
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// The authenticated user, or `None` for anonymous requests.
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<String>);

impl Identity {
    pub fn user(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The user name, or 401 for anonymous callers.
    pub fn require(&self) -> RouteResult<&str> {
        self.user().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            )
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(REMOTE_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        Ok(Self(user))
    }
}
