//! The uniform result shape returned by every gateway operation.
//!
//! Callers branch on one flag instead of matching provider error types.
//! On the wire a success is `{"success": true, ...payload}` and a failure is
//! `{"success": false, "error": "..."}`.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Which side of the trust boundary a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller input rejected before any provider call
    Validation,
    /// The provider declined or failed the request
    Provider,
    /// Anything else; the message may carry internal detail
    Unexpected,
}

/// A failed gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub error: String,
}

impl Failure {
    pub fn validation(error: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            error: error.into(),
        }
    }

    /// Classify a library error raised while performing `operation`.
    ///
    /// Produces `"<operation> API error: ..."` for provider errors and
    /// `"<operation> failed: ..."` for everything else.
    pub fn from_error(operation: &str, err: &Error) -> Self {
        if err.is_provider_error() {
            Self {
                kind: FailureKind::Provider,
                error: format!("{operation} API error: {err}"),
            }
        } else {
            Self {
                kind: FailureKind::Unexpected,
                error: format!("{operation} failed: {err}"),
            }
        }
    }

    pub fn is_unexpected(&self) -> bool {
        self.kind == FailureKind::Unexpected
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

/// Success payload or failure, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

#[derive(Serialize)]
struct SuccessBody<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    error: &'a str,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(payload) => SuccessBody {
                success: true,
                payload,
            }
            .serialize(serializer),
            Self::Failure(failure) => FailureBody {
                success: false,
                error: &failure.error,
            }
            .serialize(serializer),
        }
    }
}

/// A completed translation of one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPayload {
    pub translated_text: String,
    /// Declared source, or the provider's detection when none was given
    pub source_language: String,
    pub target_language: String,
    pub original_text: String,
}

/// A language detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub language: String,
    /// Provider-defined range; Google reports 0.0..=1.0
    pub confidence: f64,
}
