//! Persisted and exchanged data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::TranslationPayload;
use crate::util::preview;

/// A `{code, name}` pair from the provider's language listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

impl LanguageEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// One completed translation, as stored in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: u64,
    /// Owning identity; `None` for anonymous use
    pub owner: Option<String>,
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
}

impl TranslationRecord {
    /// One-line summary: `en -> es: Hello there...`
    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {}",
            self.source_language,
            self.target_language,
            preview(&self.original_text, 50)
        )
    }
}

/// A record the caller wants appended; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslationRecord {
    pub owner: Option<String>,
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

impl NewTranslationRecord {
    pub fn from_payload(owner: Option<String>, payload: &TranslationPayload) -> Self {
        Self {
            owner,
            original_text: payload.original_text.clone(),
            translated_text: payload.translated_text.clone(),
            source_language: payload.source_language.clone(),
            target_language: payload.target_language.clone(),
        }
    }
}

/// A catalog entry for a language the provider claims to support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_summary() {
        let record = TranslationRecord {
            id: 1,
            owner: None,
            original_text: "a".repeat(60),
            translated_text: "b".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            created_at: Utc::now(),
        };
        assert_eq!(record.summary(), format!("en -> es: {}...", "a".repeat(50)));
    }

    #[test]
    fn test_new_record_from_payload() {
        let payload = TranslationPayload {
            translated_text: "hola".into(),
            source_language: "en".into(),
            target_language: "es".into(),
            original_text: "hello".into(),
        };
        let record = NewTranslationRecord::from_payload(Some("alice".into()), &payload);
        assert_eq!(record.owner.as_deref(), Some("alice"));
        assert_eq!(record.original_text, "hello");
        assert_eq!(record.translated_text, "hola");
        assert_eq!(record.target_language, "es");
    }
}
