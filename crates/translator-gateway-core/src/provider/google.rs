use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::token::TokenSource;
use super::traits::{ProviderDetection, ProviderInfo, ProviderTranslation, TranslationProvider};
use crate::config::{Lang, ProviderConfig};
use crate::error::{Error, Result};
use crate::model::LanguageEntry;

const V2_PATH: &str = "/language/translate/v2";

/// Google Cloud Translation (v2 REST) provider
pub struct GoogleTranslateProvider {
    client: Client,
    tokens: Arc<TokenSource>,
    /// Base URL for the API (e.g., "https://translation.googleapis.com")
    pub api_base: String,
    /// Extra attempts after a transient failure
    pub retry_count: u32,
    /// Delay between retries in milliseconds
    pub retry_delay_ms: u64,
    /// Longest Retry-After we are willing to sleep through
    max_retry_wait: Duration,
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<WireTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTranslation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct DetectData {
    #[serde(default)]
    detections: Vec<Vec<WireDetection>>,
}

#[derive(Debug, Deserialize)]
struct WireDetection {
    language: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Serialize)]
struct LanguagesRequest<'a> {
    target: &'a str,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    #[serde(default)]
    languages: Vec<WireLanguage>,
}

#[derive(Debug, Deserialize)]
struct WireLanguage {
    language: String,
    #[serde(default)]
    name: Option<String>,
}

impl GoogleTranslateProvider {
    /// Build a provider with its own HTTP client and an explicit request timeout.
    pub fn new(config: &ProviderConfig, tokens: Arc<TokenSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            tokens,
            api_base: config.api_base.clone(),
            retry_count: config.retry_count,
            retry_delay_ms: config.retry_delay_ms,
            max_retry_wait: Duration::from_secs(config.timeout_secs),
        })
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}{V2_PATH}{suffix}", self.api_base.trim_end_matches('/'))
    }

    /// POST a JSON body and unwrap the `data` envelope, retrying transient failures.
    async fn post<B, R>(&self, suffix: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(suffix);
        let attempts = self.retry_count.saturating_add(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            debug!("Provider request attempt {}/{} to {}", attempt + 1, attempts, url);

            let token = self.tokens.access_token().await?;
            let err = match self.client.post(&url).bearer_auth(token).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<Envelope<R>>()
                            .await
                            .map(|envelope| envelope.data)
                            .map_err(|e| Error::ProviderInvalidResponse(e.to_string()));
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse().ok());
                        warn!("Rate limited, retry after {:?}s", retry_after);
                        Error::ProviderRateLimited { retry_after }
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        warn!("Provider error: {} - {}", status, body);
                        rejection(status, &body)
                    }
                }
                Err(e) if e.is_timeout() => {
                    warn!("Provider request timed out: {}", e);
                    Error::ProviderTimeout
                }
                Err(e) => {
                    warn!("Provider request failed: {}", e);
                    Error::ProviderRequest(e.to_string())
                }
            };

            if !err.is_transient() {
                return Err(err);
            }

            // Wait before retry, honouring Retry-After when it is longer
            if attempt + 1 < attempts {
                let mut wait = Duration::from_millis(self.retry_delay_ms);
                if let Error::ProviderRateLimited { retry_after: Some(secs) } = err {
                    let requested = Duration::from_secs(secs);
                    if requested > self.max_retry_wait {
                        warn!("Retry-After of {}s exceeds the request timeout, giving up", secs);
                        return Err(err);
                    }
                    wait = wait.max(requested);
                }
                tokio::time::sleep(wait.min(self.max_retry_wait)).await;
            }
            last_error = Some(err);
        }

        error!("Provider request to {} failed after {} attempts", url, attempts);
        Err(last_error.unwrap_or_else(|| Error::ProviderRequest("no attempt was made".to_string())))
    }
}

/// Map a non-success response to a rejection, preferring Google's error message.
fn rejection(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Error::ProviderRejected {
        status: status.as_u16(),
        message,
    }
}

fn into_translations(data: TranslateData, expected: usize) -> Result<Vec<ProviderTranslation>> {
    if data.translations.len() != expected {
        return Err(Error::ProviderInvalidResponse(format!(
            "expected {expected} translations, got {}",
            data.translations.len()
        )));
    }

    Ok(data
        .translations
        .into_iter()
        .map(|t| ProviderTranslation {
            translated_text: t.translated_text,
            detected_source_language: t.detected_source_language.filter(|l| !l.is_empty()),
        })
        .collect())
}

fn into_detection(data: DetectData) -> Result<ProviderDetection> {
    data.detections
        .into_iter()
        .next()
        .and_then(|candidates| {
            candidates
                .into_iter()
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        })
        .map(|d| ProviderDetection {
            language: d.language,
            confidence: d.confidence,
        })
        .ok_or_else(|| Error::ProviderInvalidResponse("no detections in response".to_string()))
}

fn into_languages(data: LanguagesData) -> Vec<LanguageEntry> {
    data.languages
        .into_iter()
        .map(|l| {
            let name = l.name.unwrap_or_else(|| l.language.clone());
            LanguageEntry::new(l.language, name)
        })
        .collect()
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo { name: "Google Cloud Translation" }
    }

    async fn translate(
        &self,
        texts: &[String],
        target: &Lang,
        source: Option<&Lang>,
    ) -> Result<Vec<ProviderTranslation>> {
        let request = TranslateRequest {
            q: texts,
            target: target.as_str(),
            source: source.map(Lang::as_str),
            format: "text",
        };

        let data: TranslateData = self.post("", &request).await?;
        into_translations(data, texts.len())
    }

    async fn detect(&self, text: &str) -> Result<ProviderDetection> {
        let data: DetectData = self.post("/detect", &DetectRequest { q: [text] }).await?;
        into_detection(data)
    }

    async fn languages(&self, display_language: &Lang) -> Result<Vec<LanguageEntry>> {
        let request = LanguagesRequest {
            target: display_language.as_str(),
        };
        let data: LanguagesData = self.post("/languages", &request).await?;
        Ok(into_languages(data))
    }
}
