//! Translation gateway: the single entry point callers use for translation.
//!
//! Every operation returns a value. Provider and input errors are folded into
//! [`Outcome::Failure`]; the language listing degrades to an empty list.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::cache::LanguageCache;
use crate::config::{AppConfig, CredentialsConfig, Lang};
use crate::error::{Error, Result};
use crate::model::LanguageEntry;
use crate::outcome::{Detection, Failure, Outcome, TranslationPayload};
use crate::provider::{ProviderTranslation, TranslationProvider, create_provider};
use crate::util::preview;

pub const NO_TEXT_TO_TRANSLATE: &str = "No text provided for translation";
pub const NO_TEXT_TO_DETECT: &str = "No text provided for language detection";
pub const NO_TARGET_LANGUAGE: &str = "No target language specified";

const TRANSLATION: &str = "Translation";
const DETECTION: &str = "Language detection";

/// Uniform, failure-safe interface over one translation provider.
pub struct TranslationGateway {
    provider: Arc<dyn TranslationProvider>,
    languages: Option<LanguageCache>,
}

impl TranslationGateway {
    /// Wrap an already constructed provider (no language cache)
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            languages: None,
        }
    }

    /// Build the provider from configuration.
    ///
    /// Credentials come from the config file with environment variables
    /// taking precedence. This is the one gateway operation that raises:
    /// without a working client nothing else can proceed.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::from_credentials(config, &config.credentials_with_env())
    }

    /// Build the provider from configuration and already resolved credentials.
    pub fn from_credentials(config: &AppConfig, credentials: &CredentialsConfig) -> Result<Self> {
        let provider = create_provider(config, credentials).inspect_err(|e| {
            error!("Failed to initialize translation provider: {}", e);
        })?;

        info!("Translation gateway ready ({})", provider.name());

        Ok(Self {
            provider,
            languages: LanguageCache::from_config(&config.language_cache),
        })
    }

    /// Attach a language-listing cache
    #[must_use]
    pub fn with_language_cache(mut self, cache: LanguageCache) -> Self {
        self.languages = Some(cache);
        self
    }

    /// Translate one text.
    ///
    /// `source` of `None`, `""` or `"auto"` requests auto-detection.
    pub async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Outcome<TranslationPayload> {
        if text.trim().is_empty() {
            return Failure::validation(NO_TEXT_TO_TRANSLATE).into();
        }
        let Some(target) = target_lang(target) else {
            return Failure::validation(NO_TARGET_LANGUAGE).into();
        };
        let source = Lang::source(source);

        debug!(
            "Translating '{}' to {} (source: {})",
            preview(text, 40),
            target,
            source.as_ref().map_or("auto", Lang::as_str)
        );

        let texts = [text.to_string()];
        let result = self
            .provider
            .translate(&texts, &target, source.as_ref())
            .await
            .and_then(|translations| {
                translations.into_iter().next().ok_or_else(|| {
                    Error::ProviderInvalidResponse("no translation returned".to_string())
                })
            })
            .and_then(|translation| payload(text.to_string(), translation, &target, source.as_ref()));

        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => {
                let failure = Failure::from_error(TRANSLATION, &e);
                log_failure(&failure, &e);
                failure.into()
            }
        }
    }

    /// Translate many texts in one provider round trip.
    ///
    /// The result always has the same length and order as `texts`. Blank
    /// entries fail validation in place without being sent; a provider fault
    /// fails every remaining entry with the same failure.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        target: &str,
        source: Option<&str>,
    ) -> Vec<Outcome<TranslationPayload>> {
        if texts.is_empty() {
            return Vec::new();
        }
        let Some(target) = target_lang(target) else {
            return vec![Failure::validation(NO_TARGET_LANGUAGE).into(); texts.len()];
        };
        let source = Lang::source(source);

        let mut results: Vec<Outcome<TranslationPayload>> =
            vec![Failure::validation(NO_TEXT_TO_TRANSLATE).into(); texts.len()];

        let (positions, pending): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| (i, text.clone()))
            .unzip();

        if pending.is_empty() {
            return results;
        }

        debug!("Translating batch of {} texts to {}", pending.len(), target);

        let translated = self
            .provider
            .translate(&pending, &target, source.as_ref())
            .await
            .and_then(|translations| {
                if translations.len() == pending.len() {
                    Ok(translations)
                } else {
                    Err(Error::ProviderInvalidResponse(format!(
                        "expected {} translations, got {}",
                        pending.len(),
                        translations.len()
                    )))
                }
            });

        match translated {
            Ok(translations) => {
                for ((position, text), translation) in
                    positions.into_iter().zip(pending).zip(translations)
                {
                    results[position] = match payload(text, translation, &target, source.as_ref()) {
                        Ok(payload) => Outcome::Success(payload),
                        Err(e) => Failure::from_error(TRANSLATION, &e).into(),
                    };
                }
            }
            Err(e) => {
                let failure = Failure::from_error(TRANSLATION, &e);
                log_failure(&failure, &e);
                for position in positions {
                    results[position] = failure.clone().into();
                }
            }
        }

        results
    }

    /// Detect the language of a text.
    pub async fn detect_language(&self, text: &str) -> Outcome<Detection> {
        if text.trim().is_empty() {
            return Failure::validation(NO_TEXT_TO_DETECT).into();
        }

        match self.provider.detect(text).await {
            Ok(detection) => Outcome::Success(Detection {
                language: detection.language,
                confidence: detection.confidence,
            }),
            Err(e) => {
                let failure = Failure::from_error(DETECTION, &e);
                log_failure(&failure, &e);
                failure.into()
            }
        }
    }

    /// List supported languages with names in `display_language`.
    ///
    /// Returns an empty list on any fault; callers substitute their own
    /// defaults.
    pub async fn list_supported_languages(&self, display_language: &str) -> Vec<LanguageEntry> {
        let display_lang = target_lang(display_language).unwrap_or_else(|| Lang::new("en"));

        if let Some(ref cache) = self.languages
            && let Some(cached) = cache.get(&display_lang).await
        {
            debug!("Language listing cache hit for {}", display_lang);
            return cached.as_ref().clone();
        }

        match self.provider.languages(&display_lang).await {
            Ok(languages) => {
                if let Some(ref cache) = self.languages {
                    cache.insert(display_lang, languages.clone()).await;
                }
                languages
            }
            Err(e) => {
                warn!("Error fetching supported languages: {}", e);
                Vec::new()
            }
        }
    }
}

fn target_lang(code: &str) -> Option<Lang> {
    let code = code.trim();
    (!code.is_empty()).then(|| Lang::new(code))
}

/// Shape one provider translation, insisting on a known source language.
fn payload(
    original_text: String,
    translation: ProviderTranslation,
    target: &Lang,
    source: Option<&Lang>,
) -> Result<TranslationPayload> {
    let source_language = translation
        .detected_source_language
        .or_else(|| source.map(ToString::to_string))
        .ok_or_else(|| {
            Error::ProviderInvalidResponse("detected source language missing".to_string())
        })?;

    Ok(TranslationPayload {
        translated_text: translation.translated_text,
        source_language,
        target_language: target.to_string(),
        original_text,
    })
}

fn log_failure(failure: &Failure, err: &Error) {
    if failure.is_unexpected() {
        error!("Unexpected gateway error: {:?}", err);
    } else {
        warn!("{}", failure);
    }
}
