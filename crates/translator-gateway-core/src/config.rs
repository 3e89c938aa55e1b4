use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::LanguageEntry;

/// Sentinel source language meaning "let the provider detect it".
pub const AUTO_DETECT: &str = "auto";

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0.eq_ignore_ascii_case(AUTO_DETECT)
    }

    /// Normalize an optional caller-supplied source language.
    ///
    /// Absent, blank and the `auto` sentinel all collapse to `None`.
    pub fn source(code: Option<&str>) -> Option<Self> {
        code.map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Self::new)
            .filter(|lang| !lang.is_auto())
    }
}

fn default_display_language() -> Lang {
    Lang::new("en")
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Provider endpoint configuration for the Google Cloud Translation v2 API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Per-request timeout; a timeout is reported as a provider failure
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure (0 = no retry)
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_api_base() -> String {
    "https://translation.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            retry_count: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Service account fields as they may appear in the config file.
///
/// Every field is optional here; environment variables fill the gaps and
/// [`crate::provider::ServiceAccountCredentials`] checks completeness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: Option<String>,
    pub client_email: Option<String>,
    pub client_id: Option<String>,
    pub auth_uri: Option<String>,
    pub token_uri: Option<String>,
}

impl CredentialsConfig {
    /// Read credential fields from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credential fields through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            project_id: get("PROJECT_ID"),
            private_key_id: get("PRIVATE_KEY_ID"),
            private_key: get("PRIVATE_KEY"),
            client_email: get("CLIENT_EMAIL"),
            client_id: get("CLIENT_ID"),
            auth_uri: get("AUTH_URI"),
            token_uri: get("TOKEN_URI"),
        }
    }

    /// Fill any field missing here from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            project_id: self.project_id.or(other.project_id),
            private_key_id: self.private_key_id.or(other.private_key_id),
            private_key: self.private_key.or(other.private_key),
            client_email: self.client_email.or(other.client_email),
            client_id: self.client_id.or(other.client_id),
            auth_uri: self.auth_uri.or(other.auth_uri),
            token_uri: self.token_uri.or(other.token_uri),
        }
    }
}

/// History store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Store directory (defaults to $XDG_DATA_HOME/translator-gateway/history)
    pub path: Option<PathBuf>,

    /// Append a record after every successful translation
    #[serde(default = "default_true")]
    pub record_translations: bool,

    /// Records per history page in the web UI
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

const fn default_true() -> bool {
    true
}

const fn default_per_page() -> usize {
    10
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            record_translations: true,
            per_page: default_per_page(),
        }
    }
}

impl HistoryConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::util::default_history_path)
    }
}

/// Cache for supported-language listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageCacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Listing TTL in seconds (0 = no expiry)
    #[serde(default = "default_language_ttl")]
    pub ttl_seconds: u64,

    /// Distinct display languages kept
    #[serde(default = "default_language_entries")]
    pub max_entries: u64,
}

const fn default_language_ttl() -> u64 {
    24 * 60 * 60
}

const fn default_language_entries() -> u64 {
    32
}

impl Default for LanguageCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_language_ttl(),
            max_entries: default_language_entries(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Translation provider endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Service account credentials (environment fills missing fields)
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// History store
    #[serde(default)]
    pub history: HistoryConfig,

    /// Supported-language listing cache
    #[serde(default)]
    pub language_cache: LanguageCacheConfig,

    /// Language used for language display names
    #[serde(default = "default_display_language")]
    pub display_language: Lang,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            credentials: CredentialsConfig::default(),
            history: HistoryConfig::default(),
            language_cache: LanguageCacheConfig::default(),
            display_language: default_display_language(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, crate::error::Error> {
        toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/translator-gateway/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("translator-gateway").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Credentials with environment variables taking precedence over the file.
    pub fn credentials_with_env(&self) -> CredentialsConfig {
        CredentialsConfig::from_env().or(self.credentials.clone())
    }

    /// Credentials with values from `lookup` taking precedence over the file.
    pub fn credentials_with(&self, lookup: impl Fn(&str) -> Option<String>) -> CredentialsConfig {
        CredentialsConfig::from_lookup(lookup).or(self.credentials.clone())
    }

    /// Check values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.provider.api_base.trim().is_empty() {
            return Err(crate::error::Error::ConfigInvalid {
                field: "provider.api_base".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.provider.timeout_secs == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "provider.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.history.per_page == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "history.per_page".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Languages shown when the provider listing comes back empty.
pub fn fallback_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("en", "English"),
        LanguageEntry::new("es", "Spanish"),
        LanguageEntry::new("fr", "French"),
    ]
}

/// Default target language code for the translate form
pub const DEFAULT_TARGET_LANG: &str = "es";
