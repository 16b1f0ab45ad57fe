mod common;

use std::fs;

use cdjournal_domain::{slots::balance_sheet as bs, StatementKind};
use common::{open_session, setup_session, storage_at};

#[test]
fn backups_can_be_listed_and_restored() {
    let (mut session, _) = setup_session();
    session
        .set_line_item(StatementKind::BalanceSheet, bs::CASH, 100.0, None)
        .expect("cash");
    let info = session.backup(Some("before cleanup")).expect("backup");
    assert!(info.id.contains("before-cleanup"));

    session
        .set_line_item(StatementKind::BalanceSheet, bs::CASH, 0.0, None)
        .expect("clear cash");
    assert_eq!(session.statements().balance_sheet.total_assets, 0.0);

    let backups = session.list_backups().expect("list");
    assert!(backups.iter().any(|backup| backup.id == info.id));
    session.restore_backup(&info).expect("restore");
    assert_eq!(session.statements().balance_sheet.total_assets, 100.0);
}

#[test]
fn corrupt_journal_file_opens_as_fresh_document() {
    let (session, base) = setup_session();
    drop(session);
    let storage = storage_at(&base);
    fs::create_dir_all(storage.document_path().parent().unwrap()).unwrap();
    fs::write(storage.document_path(), "{{{").expect("corrupt");

    let reopened = open_session(&base, true);
    assert_eq!(reopened.document().gl_accounts.len(), 26);
    assert!(reopened.document().years.is_empty());
}

#[test]
fn saved_file_uses_year_keys_and_gl_accounts() {
    let (mut session, base) = setup_session();
    session
        .set_line_item(StatementKind::BalanceSheet, bs::CASH, 42.0, Some("1010".into()))
        .expect("cash");
    let text = fs::read_to_string(storage_at(&base).document_path()).expect("read journal");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["glAccounts"]["1010"]["type"], "assets");
    assert_eq!(value["2025"]["balanceSheet"]["2025-03"]["cash"]["amount"], 42.0);
    assert_eq!(value["2025"]["balanceSheet"]["2025-03"]["cash"]["glAccount"], "1010");
}
