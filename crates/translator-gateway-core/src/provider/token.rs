//! OAuth2 access tokens for a service account (JWT bearer grant).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::credentials::ServiceAccountCredentials;
use crate::error::{Error, Result};

pub const TRANSLATION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-translation";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the provider-declared expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Mints and caches access tokens for one service account.
pub struct TokenSource {
    client: Client,
    credentials: ServiceAccountCredentials,
    key: EncodingKey,
    cached: RwLock<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(client: Client, credentials: ServiceAccountCredentials) -> Result<Self> {
        let key = credentials.encoding_key()?;
        Ok(Self {
            client,
            credentials,
            key,
            cached: RwLock::new(None),
        })
    }

    /// Signed RS256 assertion for the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.credentials.client_email,
            scope: TRANSLATION_SCOPE,
            aud: &self.credentials.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.credentials.private_key_id.clone());

        jsonwebtoken::encode(&header, &claims, &self.key)
            .map_err(|e| Error::Credentials(format!("failed to sign assertion: {e}")))
    }

    /// A valid bearer token, fetching a new one when the cached token is stale.
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref()
                && token.is_fresh(Utc::now())
            {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(token.value.clone());
        }

        let token = self.fetch().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        debug!(
            "Requesting access token for {} from {}",
            self.credentials.client_email, self.credentials.token_uri
        );

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Token request timed out: {}", e);
                    Error::ProviderTimeout
                } else {
                    Error::Token(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token endpoint returned {}: {}", status, body);
            return Err(Error::Token(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Token(format!("unreadable token response: {e}")))?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}
