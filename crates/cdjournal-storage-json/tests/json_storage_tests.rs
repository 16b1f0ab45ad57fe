use cdjournal_core::storage::DocumentStorage;
use cdjournal_domain::{
    slots::balance_sheet, Document, GlAccountType, LineItem, Period, StatementKind,
};
use cdjournal_storage_json::{JsonDocumentStorage, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn sample_document() -> Document {
    let mut document = Document::new();
    let period = Period::new(2025, 2).expect("period");
    document
        .line_items_mut(period, StatementKind::BalanceSheet)
        .insert(balance_sheet::CASH.into(), LineItem::tagged(2_500.0, "1010"));
    document.journal_mut(period).balance_brought_forward = 1_000.0;
    document
}

#[test]
fn json_storage_can_save_and_load_document() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::new(StoragePaths::under(dir.path())).expect("storage");

    let document = sample_document();
    storage.save_document(&document).expect("save document");
    let loaded = storage
        .load_document()
        .expect("load document")
        .expect("document present");

    assert_eq!(loaded, document);
    let path = storage.document_path();
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::new(StoragePaths::under(dir.path())).expect("storage");
    assert!(storage.load_document().expect("load").is_none());
}

#[test]
fn corrupt_file_loads_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::new(StoragePaths::under(dir.path())).expect("storage");
    fs::write(storage.document_path(), "{ not json").expect("write corrupt file");
    assert!(storage.load_document().expect("load").is_none());
    assert!(storage.load_document_from_path(storage.document_path()).is_err());
}

#[test]
fn legacy_document_is_migrated_on_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::new(StoragePaths::under(dir.path())).expect("storage");
    fs::write(
        storage.document_path(),
        r#"{"2023": {"balanceSheet": {"2023-11": {"cash": 75, "inventory": "12.5"}}}}"#,
    )
    .expect("write legacy file");

    let loaded = storage
        .load_document()
        .expect("load")
        .expect("legacy document present");
    let items = loaded
        .line_items(Period::new(2023, 11).unwrap(), StatementKind::BalanceSheet)
        .expect("items");
    assert_eq!(items["cash"], LineItem::new(75.0));
    assert_eq!(items["inventory"], LineItem::new(12.5));
    assert_eq!(
        loaded.gl_accounts.get("1010").map(|account| account.account_type),
        Some(GlAccountType::Assets)
    );
}

#[test]
fn saving_twice_backs_up_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::new(StoragePaths::under(dir.path())).expect("storage");
    storage.save_document(&Document::new()).expect("first save");
    assert!(storage.list_backups().expect("list").is_empty());

    storage.save_document(&sample_document()).expect("second save");
    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 1);
    let previous = storage.restore_backup(&backups[0]).expect("restore");
    assert_eq!(previous, Document::new());
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let storage = JsonDocumentStorage::new(paths.clone()).expect("storage");

    let document = sample_document();
    let info = storage
        .backup_document(&document, Some("Month End: Feb"))
        .expect("create backup");
    assert!(info.id.ends_with("_month-end-feb.json"), "id was {}", info.id);
    assert_eq!(info.path.parent(), Some(paths.backup_root.as_path()));

    let backups = storage.list_backups().expect("list backups");
    assert!(
        backups.iter().any(|entry| entry.id == info.id),
        "backup list should include created backup"
    );

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored, document);
    let reloaded = storage.load_document().expect("load").expect("present");
    assert_eq!(reloaded, document);
}

#[test]
fn retention_keeps_newest_backups() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonDocumentStorage::with_retention(StoragePaths::under(dir.path()), 2).expect("storage");
    let document = Document::new();
    let mut created = Vec::new();
    for _ in 0..4 {
        created.push(storage.backup_document(&document, None).expect("backup"));
    }

    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 2);
    let ids: Vec<&str> = backups.iter().map(|info| info.id.as_str()).collect();
    assert!(ids.contains(&created[3].id.as_str()));
    assert!(!created[0].path.exists());
}

#[test]
fn rapid_backups_never_share_a_name() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonDocumentStorage::with_retention(StoragePaths::under(dir.path()), 1_000)
        .expect("storage");
    let document = Document::new();
    let mut ids = std::collections::BTreeSet::new();
    for _ in 0..200 {
        let info = storage.backup_document(&document, None).expect("backup");
        assert!(ids.insert(info.id), "backup name reused");
    }
    assert_eq!(storage.list_backups().expect("list").len(), 200);
    let files = fs::read_dir(storage.backups_dir()).expect("read dir").count();
    assert_eq!(files, 200);
}

#[test]
fn noted_backups_outlive_retention() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonDocumentStorage::with_retention(StoragePaths::under(dir.path()), 2).expect("storage");
    storage.save_document(&Document::new()).expect("initial save");
    let noted = storage
        .backup_document(&sample_document(), Some("month end"))
        .expect("noted backup");

    for _ in 0..6 {
        storage.save_document(&sample_document()).expect("save");
    }

    let backups = storage.list_backups().expect("list");
    assert!(backups.iter().any(|info| info.id == noted.id));
    let automatic = backups.iter().filter(|info| info.id != noted.id).count();
    assert_eq!(automatic, 2);
}
