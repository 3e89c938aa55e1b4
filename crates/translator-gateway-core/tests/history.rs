//! Integration tests for the history store and language catalog on disk.

use translator_gateway_core::{
    Database, DeleteOutcome, LanguageEntry, NewTranslationRecord, TranslationPayload,
};

fn payload(original: &str, translated: &str) -> TranslationPayload {
    TranslationPayload {
        translated_text: translated.to_string(),
        source_language: "en".to_string(),
        target_language: "es".to_string(),
        original_text: original.to_string(),
    }
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");

    let id = {
        let db = Database::open(&path).unwrap();
        let history = db.history().unwrap();
        let record = history
            .append(NewTranslationRecord::from_payload(
                Some("alice".to_string()),
                &payload("hello", "hola"),
            ))
            .unwrap();
        record.id
    };

    let db = Database::open(&path).unwrap();
    let history = db.history().unwrap();
    let record = history.get(id).unwrap().expect("record persisted");
    assert_eq!(record.translated_text, "hola");
    assert_eq!(record.owner.as_deref(), Some("alice"));
}

#[test]
fn test_delete_requires_owner_across_identities() {
    let db = Database::temporary().unwrap();
    let history = db.history().unwrap();

    let alice = history
        .append(NewTranslationRecord::from_payload(Some("alice".into()), &payload("a", "b")))
        .unwrap();
    let bob = history
        .append(NewTranslationRecord::from_payload(Some("bob".into()), &payload("c", "d")))
        .unwrap();

    assert_eq!(history.delete(alice.id, "bob").unwrap(), DeleteOutcome::NotFound);
    assert_eq!(history.list(Some("alice")).unwrap().len(), 1);

    assert_eq!(history.delete(bob.id, "bob").unwrap(), DeleteOutcome::Deleted);
    assert!(history.list(Some("bob")).unwrap().is_empty());
    assert_eq!(history.list(Some("alice")).unwrap(), vec![alice]);
}

#[test]
fn test_concurrent_deletes_resolve_once() {
    let db = Database::temporary().unwrap();
    let history = db.history().unwrap();
    let record = history
        .append(NewTranslationRecord::from_payload(Some("alice".into()), &payload("a", "b")))
        .unwrap();

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let history = history.clone();
                scope.spawn(move || history.delete(record.id, "alice").unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let deleted = outcomes.iter().filter(|o| **o == DeleteOutcome::Deleted).count();
    assert_eq!(deleted, 1);
}

#[test]
fn test_catalog_shares_database_with_history() {
    let db = Database::temporary().unwrap();
    let history = db.history().unwrap();
    let catalog = db.catalog().unwrap();

    catalog
        .sync(&[LanguageEntry::new("fr", "French"), LanguageEntry::new("de", "German")])
        .unwrap();
    history
        .append(NewTranslationRecord::from_payload(None, &payload("x", "y")))
        .unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(history.len(), 1);
    assert_eq!(catalog.list().unwrap()[0].code, "fr");
}
