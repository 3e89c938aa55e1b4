//! Service account credential assembly.

use jsonwebtoken::EncodingKey;
use serde::{Deserialize, Serialize};

use crate::config::CredentialsConfig;
use crate::error::{Error, Result};

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Service account key material, shaped like a Google JSON key file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountCredentials {
    pub project_id: String,
    pub private_key_id: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
}

impl ServiceAccountCredentials {
    /// Assemble credentials from configuration.
    ///
    /// Fails if a required field is missing or the private key is not a
    /// usable RSA PEM key.
    pub fn from_config(config: &CredentialsConfig) -> Result<Self> {
        let required = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned)
                .ok_or_else(|| Error::Credentials(format!("{name} is not set")))
        };

        let credentials = Self {
            project_id: required(&config.project_id, "PROJECT_ID")?,
            private_key_id: required(&config.private_key_id, "PRIVATE_KEY_ID")?,
            private_key: unescape_newlines(&required(&config.private_key, "PRIVATE_KEY")?),
            client_email: required(&config.client_email, "CLIENT_EMAIL")?,
            client_id: config.client_id.clone().unwrap_or_default(),
            auth_uri: config
                .auth_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: config
                .token_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        };

        // Parse once up front so a bad key fails at startup, not on first request
        credentials.encoding_key()?;
        Ok(credentials)
    }

    pub fn encoding_key(&self) -> Result<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Credentials(format!("PRIVATE_KEY is not a valid RSA PEM key: {e}")))
    }
}

impl std::fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// Keys pasted into `.env` files usually carry literal `\n` sequences.
fn unescape_newlines(key: &str) -> String {
    key.replace("\\n", "\n")
}
