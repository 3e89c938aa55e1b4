use chrono::Utc;
use sled::{Db, Tree};
use tracing::{debug, warn};

use super::{decode, encode};
use crate::error::{Error, Result};
use crate::model::{NewTranslationRecord, TranslationRecord};

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Missing, or owned by someone else
    NotFound,
}

/// One page of an owner's history, most recent first.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub records: Vec<TranslationRecord>,
    /// 1-based, clamped to `1..=total_pages`
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Append/list/delete store for translation records.
///
/// Records are keyed by big-endian id. Records are never updated in place.
#[derive(Clone)]
pub struct HistoryStore {
    db: Db,
    tree: Tree,
}

impl HistoryStore {
    pub(super) const fn new(db: Db, tree: Tree) -> Self {
        Self { db, tree }
    }

    pub fn append(&self, record: NewTranslationRecord) -> Result<TranslationRecord> {
        if record.original_text.trim().is_empty() {
            return Err(Error::Validation("original text must not be empty".to_string()));
        }
        if record.target_language.trim().is_empty() {
            return Err(Error::Validation("target language must not be empty".to_string()));
        }

        let id = self
            .db
            .generate_id()
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        let record = TranslationRecord {
            id,
            owner: record.owner,
            original_text: record.original_text,
            translated_text: record.translated_text,
            source_language: record.source_language,
            target_language: record.target_language,
            created_at: Utc::now(),
        };

        self.tree
            .insert(id.to_be_bytes(), encode(&record)?)
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        // Flush to ensure persistence
        self.tree
            .flush()
            .map_err(|e| Error::StoreWrite(format!("Flush failed: {e}")))?;

        debug!("Recorded translation {} ({})", record.id, record.summary());
        Ok(record)
    }

    pub fn get(&self, id: u64) -> Result<Option<TranslationRecord>> {
        self.tree
            .get(id.to_be_bytes())
            .map_err(|e| Error::StoreRead(e.to_string()))?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// Records belonging to `owner` (anonymous records for `None`), newest first.
    pub fn list(&self, owner: Option<&str>) -> Result<Vec<TranslationRecord>> {
        let mut records = Vec::new();
        for entry in self.tree.iter() {
            let (_, raw) = entry.map_err(|e| Error::StoreRead(e.to_string()))?;
            let record: TranslationRecord = match decode(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable history record: {}", e);
                    continue;
                }
            };
            if record.owner.as_deref() == owner {
                records.push(record);
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    pub fn page(&self, owner: Option<&str>, page: usize, per_page: usize) -> Result<HistoryPage> {
        let per_page = per_page.max(1);
        let all = self.list(owner)?;
        let total = all.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        let records = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(HistoryPage {
            records,
            page,
            total_pages,
            total,
        })
    }

    /// Delete a record on behalf of `owner`.
    ///
    /// Anything but an existing record owned by `owner` is `NotFound` and
    /// leaves the store untouched. Concurrent deletes of one record yield a
    /// single `Deleted`.
    pub fn delete(&self, id: u64, owner: &str) -> Result<DeleteOutcome> {
        let key = id.to_be_bytes();
        let Some(raw) = self
            .tree
            .get(key)
            .map_err(|e| Error::StoreRead(e.to_string()))?
        else {
            return Ok(DeleteOutcome::NotFound);
        };

        let record: TranslationRecord = decode(&raw)?;
        if record.owner.as_deref() != Some(owner) {
            debug!("Refusing to delete translation {} for {}", id, owner);
            return Ok(DeleteOutcome::NotFound);
        }

        let swapped = self
            .tree
            .compare_and_swap(key, Some(raw), None::<&[u8]>)
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        if swapped.is_err() {
            return Ok(DeleteOutcome::NotFound);
        }

        self.tree
            .flush()
            .map_err(|e| Error::StoreWrite(format!("Flush failed: {e}")))?;

        debug!("Deleted translation {}", id);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
