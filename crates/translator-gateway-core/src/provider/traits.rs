use async_trait::async_trait;
use crate::config::Lang;
use crate::error::Result;
use crate::model::LanguageEntry;

/// Information about a translation provider
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Human-readable name
    pub name: &'static str,
}

/// One translated text as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTranslation {
    pub translated_text: String,
    /// Present when the provider detected the source itself
    pub detected_source_language: Option<String>,
}

/// The provider's best guess for a text's language.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDetection {
    pub language: String,
    pub confidence: f64,
}

/// Trait for translation backends
///
/// Implementations speak the provider's wire format and report failures as
/// [`crate::Error`]; normalization into the uniform result shape happens in
/// [`crate::TranslationGateway`].
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Get information about this provider
    fn info(&self) -> ProviderInfo;

    /// Get the provider name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate every text in one round trip, preserving order.
    ///
    /// `source` of `None` requests auto-detection.
    async fn translate(
        &self,
        texts: &[String],
        target: &Lang,
        source: Option<&Lang>,
    ) -> Result<Vec<ProviderTranslation>>;

    /// Detect the language of a text
    async fn detect(&self, text: &str) -> Result<ProviderDetection>;

    /// List supported languages with names in `display_language`
    async fn languages(&self, display_language: &Lang) -> Result<Vec<LanguageEntry>>;
}
