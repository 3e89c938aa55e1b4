use chrono::Utc;
use sled::Tree;
use tracing::{debug, warn};

use super::{decode, encode};
use crate::error::{Error, Result};
use crate::model::{LanguageEntry, SupportedLanguage};

/// Persisted catalog of languages the provider supports, keyed by code.
#[derive(Clone)]
pub struct LanguageCatalog {
    tree: Tree,
}

impl LanguageCatalog {
    pub(super) const fn new(tree: Tree) -> Self {
        Self { tree }
    }

    /// Register a new language. Fails if the code is already present.
    pub fn register(&self, code: &str, name: &str) -> Result<SupportedLanguage> {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::Validation("language code must not be empty".to_string()));
        }

        let language = SupportedLanguage {
            code: code.to_string(),
            name: name.trim().to_string(),
            registered_at: Utc::now(),
        };

        let swapped = self
            .tree
            .compare_and_swap(code.as_bytes(), None::<&[u8]>, Some(encode(&language)?))
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        if swapped.is_err() {
            return Err(Error::DuplicateLanguage(code.to_string()));
        }

        self.tree
            .flush()
            .map_err(|e| Error::StoreWrite(format!("Flush failed: {e}")))?;
        Ok(language)
    }

    pub fn get(&self, code: &str) -> Result<Option<SupportedLanguage>> {
        self.tree
            .get(code.as_bytes())
            .map_err(|e| Error::StoreRead(e.to_string()))?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// Bring the catalog in line with a provider listing.
    ///
    /// New codes are registered; known codes keep their registration time and
    /// take the listing's name. Returns how many codes were new.
    pub fn sync(&self, entries: &[LanguageEntry]) -> Result<usize> {
        let mut added = 0;
        for entry in entries {
            match self.get(&entry.code)? {
                Some(existing) if existing.name == entry.name => {}
                Some(existing) => {
                    let renamed = SupportedLanguage {
                        name: entry.name.clone(),
                        ..existing
                    };
                    self.tree
                        .insert(entry.code.as_bytes(), encode(&renamed)?)
                        .map_err(|e| Error::StoreWrite(e.to_string()))?;
                }
                None => match self.register(&entry.code, &entry.name) {
                    Ok(_) => added += 1,
                    // Lost a race with a concurrent sync; the entry exists now
                    Err(Error::DuplicateLanguage(_)) => {}
                    Err(e) => return Err(e),
                },
            }
        }

        self.tree
            .flush()
            .map_err(|e| Error::StoreWrite(format!("Flush failed: {e}")))?;

        debug!("Synced language catalog: {} new of {}", added, entries.len());
        Ok(added)
    }

    /// All languages ordered by display name.
    pub fn list(&self) -> Result<Vec<SupportedLanguage>> {
        let mut languages = Vec::with_capacity(self.tree.len());
        for entry in self.tree.iter() {
            let (_, raw) = entry.map_err(|e| Error::StoreRead(e.to_string()))?;
            match decode::<SupportedLanguage>(&raw) {
                Ok(language) => languages.push(language),
                Err(e) => warn!("Skipping unreadable catalog entry: {}", e),
            }
        }

        languages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        Ok(languages)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
