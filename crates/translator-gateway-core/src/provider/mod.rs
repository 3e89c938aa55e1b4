mod credentials;
mod google;
mod token;
mod traits;

pub use credentials::{DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI, ServiceAccountCredentials};
pub use google::GoogleTranslateProvider;
pub use token::{TRANSLATION_SCOPE, TokenSource};
pub use traits::{ProviderDetection, ProviderInfo, ProviderTranslation, TranslationProvider};

use crate::config::{AppConfig, CredentialsConfig};
use crate::error::{Error, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Create the Google provider from configuration and resolved credentials.
///
/// Any failure here is fatal for the caller.
pub fn create_provider(
    config: &AppConfig,
    credentials: &CredentialsConfig,
) -> Result<Arc<dyn TranslationProvider>> {
    let credentials = ServiceAccountCredentials::from_config(credentials)?;

    let auth_client = Client::builder()
        .timeout(Duration::from_secs(config.provider.timeout_secs))
        .build()
        .map_err(|e| Error::ClientBuild(e.to_string()))?;
    let tokens = Arc::new(TokenSource::new(auth_client, credentials)?);

    let provider = GoogleTranslateProvider::new(&config.provider, tokens)?;
    Ok(Arc::new(provider))
}
