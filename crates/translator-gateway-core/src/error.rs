use thiserror::Error;

/// Unified error type for translator-gateway-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Provider operations (requests, responses, rejections, rate limiting)
/// - Authentication (service account credentials, access tokens)
/// - Storage operations (history records, language catalog)
/// - Configuration operations (loading, validation)
///
/// The gateway never hands these to its callers directly; it folds them into
/// [`crate::Failure`] values. They surface raw only from construction and
/// from the store.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Provider Errors
    // ==========================================================================
    /// The request never produced an HTTP response (DNS, TLS, connection reset)
    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    /// The provider answered with a body we could not understand
    #[error("invalid provider response: {0}")]
    ProviderInvalidResponse(String),

    /// The provider rejected the request (bad language code, quota, fault)
    #[error("provider rejected request (HTTP {status}): {message}")]
    ProviderRejected { status: u16, message: String },

    /// Rate limited by the provider
    #[error("provider rate limited{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    ProviderRateLimited { retry_after: Option<u64> },

    /// Provider request timed out
    #[error("provider request timed out")]
    ProviderTimeout,

    // ==========================================================================
    // Authentication Errors
    // ==========================================================================
    /// Service account credential material is missing or malformed
    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    /// Exchanging the signed assertion for an access token failed
    #[error("failed to obtain access token: {0}")]
    Token(String),

    /// Failed to build the HTTP client
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ==========================================================================
    // Storage Errors
    // ==========================================================================
    /// Failed to open the record store
    #[error("failed to open store: {0}")]
    StoreOpen(String),

    /// Failed to read from the record store
    #[error("failed to read from store: {0}")]
    StoreRead(String),

    /// Failed to write to the record store
    #[error("failed to write to store: {0}")]
    StoreWrite(String),

    /// A language with this code is already registered
    #[error("language already registered: {0}")]
    DuplicateLanguage(String),

    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// Caller supplied an unusable value
    #[error("{0}")]
    Validation(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },
}

impl Error {
    /// Whether the provider itself declined or failed the request.
    ///
    /// Everything else reaching the gateway (transport faults, unreadable
    /// responses, token failures) counts as unexpected.
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderRejected { .. } | Self::ProviderRateLimited { .. } | Self::ProviderTimeout
        )
    }

    /// Whether another attempt at the same request could succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::ProviderRateLimited { .. } | Self::ProviderTimeout | Self::ProviderRequest(_) => {
                true
            }
            Self::ProviderRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_classification() {
        assert!(Error::ProviderTimeout.is_provider_error());
        assert!(Error::ProviderRateLimited { retry_after: None }.is_provider_error());
        assert!(
            Error::ProviderRejected { status: 400, message: "Invalid Value".into() }
                .is_provider_error()
        );
        assert!(!Error::ProviderRequest("connection reset".into()).is_provider_error());
        assert!(!Error::Token("HTTP 401".into()).is_provider_error());
    }

    #[test]
    fn test_transient_errors() {
        assert!(Error::ProviderTimeout.is_transient());
        assert!(Error::ProviderRejected { status: 503, message: String::new() }.is_transient());
        assert!(!Error::ProviderRejected { status: 400, message: String::new() }.is_transient());
        assert!(!Error::Credentials("missing".into()).is_transient());
    }

    #[test]
    fn test_rate_limit_message() {
        let err = Error::ProviderRateLimited { retry_after: Some(7) };
        assert_eq!(err.to_string(), "provider rate limited, retry after 7 seconds");
        let err = Error::ProviderRateLimited { retry_after: None };
        assert_eq!(err.to_string(), "provider rate limited");
    }
}
