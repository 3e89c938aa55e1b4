//! sled-backed persistence for translation history and the language catalog.

mod catalog;
mod history;

pub use catalog::LanguageCatalog;
pub use history::{DeleteOutcome, HistoryPage, HistoryStore};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::Db;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

const HISTORY_TREE: &str = "translations";
const CATALOG_TREE: &str = "supported_languages";

/// Handle to the on-disk database holding every store.
#[derive(Clone)]
pub struct Database {
    db: Db,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::StoreOpen(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            // Detect lock errors and provide actionable fix
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::StoreOpen(format!(
                    "Store locked at {}\n\n\
                    Another process is using the store, or a previous instance crashed.\n\
                    To fix: rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::StoreOpen(format!("Failed to open store at {}: {}", path.display(), e))
            }
        })?;

        debug!("Opened store at {}", path.display());

        Ok(Self { db })
    }

    /// In-memory database removed on drop; for tests and dry runs.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| Error::StoreOpen(e.to_string()))?;
        Ok(Self { db })
    }

    pub fn history(&self) -> Result<HistoryStore> {
        let tree = self
            .db
            .open_tree(HISTORY_TREE)
            .map_err(|e| Error::StoreOpen(e.to_string()))?;
        Ok(HistoryStore::new(self.db.clone(), tree))
    }

    pub fn catalog(&self) -> Result<LanguageCatalog> {
        let tree = self
            .db
            .open_tree(CATALOG_TREE)
            .map_err(|e| Error::StoreOpen(e.to_string()))?;
        Ok(LanguageCatalog::new(tree))
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::StoreWrite(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::StoreRead(e.to_string()))
}
