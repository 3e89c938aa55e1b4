//! Translator Gateway Core Library
//!
//! This library provides a uniform, failure-safe interface over a cloud
//! translation provider:
//! - Translation, batch translation, language detection and language listing
//!   via Google Cloud Translation (service account auth)
//! - One result shape for every operation: a success payload or
//!   `{error, success: false}`
//! - Translation history and a supported-language catalog (sled)
//! - Caching of language listings (moka)

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod outcome;
pub mod provider;
pub mod store;
pub mod util;

pub use cache::LanguageCache;
pub use config::{
    AUTO_DETECT, AppConfig, CredentialsConfig, DEFAULT_TARGET_LANG, HistoryConfig, Lang,
    LanguageCacheConfig, ProviderConfig, fallback_languages,
};
pub use error::{Error, Result};
pub use gateway::TranslationGateway;
pub use model::{LanguageEntry, NewTranslationRecord, SupportedLanguage, TranslationRecord};
pub use outcome::{Detection, Failure, FailureKind, Outcome, TranslationPayload};
pub use provider::{
    GoogleTranslateProvider, ProviderDetection, ProviderInfo, ProviderTranslation,
    TranslationProvider, create_provider,
};
pub use store::{Database, DeleteOutcome, HistoryPage, HistoryStore, LanguageCatalog};
