use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use translator_gateway_core::{
    AppConfig, Database, HistoryStore, LanguageCatalog, LanguageEntry, NewTranslationRecord,
    TranslationGateway, TranslationPayload, fallback_languages,
};

/// Global application state
pub struct AppState {
    /// Built once at startup and shared by every handler
    pub gateway: TranslationGateway,
    pub history: HistoryStore,
    pub catalog: LanguageCatalog,
    pub config: AppConfig,
    /// Listing last written to the catalog
    synced_listing: RwLock<Option<Vec<LanguageEntry>>>,
}

impl AppState {
    pub fn new(gateway: TranslationGateway, db: &Database, config: AppConfig) -> Result<Self> {
        Ok(Self {
            gateway,
            history: db.history()?,
            catalog: db.catalog()?,
            config,
            synced_listing: RwLock::new(None),
        })
    }

    /// Languages to offer in forms and on the languages page.
    ///
    /// A live listing refreshes the catalog. When the provider has nothing,
    /// the catalog stands in, then the built-in minimal set.
    pub async fn display_languages(&self) -> Vec<LanguageEntry> {
        let listed = self
            .gateway
            .list_supported_languages(self.config.display_language.as_str())
            .await;

        if !listed.is_empty() {
            self.refresh_catalog(&listed).await;
            return listed;
        }

        match self.catalog.list() {
            Ok(known) if !known.is_empty() => {
                debug!("Provider listing empty, using {} catalog entries", known.len());
                known
                    .into_iter()
                    .map(|language| LanguageEntry::new(language.code, language.name))
                    .collect()
            }
            Ok(_) => fallback_languages(),
            Err(e) => {
                warn!("Failed to read language catalog: {}", e);
                fallback_languages()
            }
        }
    }

    /// Write a listing into the catalog unless it is the one already written.
    ///
    /// Returns whether the catalog was synced.
    pub async fn refresh_catalog(&self, listed: &[LanguageEntry]) -> bool {
        if self.synced_listing.read().await.as_deref() == Some(listed) {
            return false;
        }

        let catalog = self.catalog.clone();
        let entries = listed.to_vec();
        match tokio::task::spawn_blocking(move || catalog.sync(&entries)).await {
            Ok(Ok(added)) => {
                debug!("Language catalog refreshed, {} new", added);
                *self.synced_listing.write().await = Some(listed.to_vec());
                true
            }
            Ok(Err(e)) => {
                warn!("Failed to sync language catalog: {}", e);
                false
            }
            Err(e) => {
                warn!("Language catalog sync task failed: {}", e);
                false
            }
        }
    }

    /// Append a successful translation to the history when recording is on.
    ///
    /// Store failures are logged; the translation itself already succeeded.
    pub fn record(&self, owner: Option<String>, payload: &TranslationPayload) {
        if !self.config.history.record_translations {
            return;
        }

        if let Err(e) = self
            .history
            .append(NewTranslationRecord::from_payload(owner, payload))
        {
            warn!("Failed to record translation: {}", e);
        }
    }
}
