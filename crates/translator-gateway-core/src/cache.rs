use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Lang, LanguageCacheConfig};
use crate::model::LanguageEntry;

/// In-memory cache of supported-language listings, keyed by display language.
#[derive(Clone)]
pub struct LanguageCache {
    cache: Cache<Lang, Arc<Vec<LanguageEntry>>>,
}

impl LanguageCache {
    pub fn new(max_entries: u64, ttl_seconds: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);

        if ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_seconds));
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Build from configuration; `None` when caching is disabled.
    pub fn from_config(config: &LanguageCacheConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.max_entries, config.ttl_seconds))
    }

    pub async fn get(&self, display_language: &Lang) -> Option<Arc<Vec<LanguageEntry>>> {
        self.cache.get(display_language).await
    }

    /// Store a listing. Empty listings are never cached.
    pub async fn insert(&self, display_language: Lang, languages: Vec<LanguageEntry>) {
        if languages.is_empty() {
            return;
        }
        self.cache.insert(display_language, Arc::new(languages)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = LanguageCache::new(8, 0);
        let en = Lang::new("en");
        cache
            .insert(en.clone(), vec![LanguageEntry::new("fr", "French")])
            .await;

        let cached = cache.get(&en).await.unwrap();
        assert_eq!(cached.as_slice(), &[LanguageEntry::new("fr", "French")]);
        assert!(cache.get(&Lang::new("de")).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_listing_not_cached() {
        let cache = LanguageCache::new(8, 0);
        cache.insert(Lang::new("en"), Vec::new()).await;
        assert!(cache.get(&Lang::new("en")).await.is_none());
    }

    #[test]
    fn test_disabled_config() {
        let config = LanguageCacheConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(LanguageCache::from_config(&config).is_none());
    }
}
