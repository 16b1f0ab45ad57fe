use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::{prelude::*, str::contains};
use tempfile::tempdir;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cdjournal_cli").unwrap();
    cmd.env("CDJOURNAL_HOME", home)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn help_lists_every_command() {
    let home = tempdir().unwrap();
    cli(home.path())
        .arg("help")
        .assert()
        .success()
        .stdout(contains("statements [YYYY-MM]"))
        .stdout(contains("add-account <number> <type> <name...>"))
        .stdout(contains("entry-add <YYYY-MM> <field=value...>"))
        .stdout(contains("Register fields"))
        .stdout(contains("backups"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = tempdir().unwrap();
    cli(home.path())
        .arg("acounts")
        .assert()
        .failure()
        .stderr(contains("Did you mean `accounts`?"));
}

#[test]
fn accounts_lists_default_chart() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["accounts", "equity"])
        .assert()
        .success()
        .stdout(contains("3010 - "))
        .stdout(contains("1010").not());
}

#[test]
fn validate_reports_type_range() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["validate", "1500", "assets"])
        .assert()
        .success();
    cli(home.path())
        .args(["validate", "1500", "liabilities"])
        .assert()
        .failure()
        .stderr(contains("2000-2999"));
}

#[test]
fn entered_line_items_drive_statements() {
    let home = tempdir().unwrap();
    for (slot, amount) in [("cash", "1500"), ("owners-equity", "1500.00")] {
        cli(home.path())
            .args(["set", "2025-03", "bs", slot, amount])
            .assert()
            .success();
    }
    cli(home.path())
        .args(["set", "2025-03", "pl", "sales-revenue", "900", "4010"])
        .assert()
        .success();

    cli(home.path())
        .args(["statements", "2025-03"])
        .assert()
        .success()
        .stdout(contains("March 2025"))
        .stdout(contains("1500.00"))
        .stdout(contains("Balance sheet balances"));

    // The last viewed month is remembered.
    cli(home.path())
        .arg("statements")
        .assert()
        .success()
        .stdout(contains("March 2025"));

    cli(home.path())
        .args(["summary", "2025"])
        .assert()
        .success()
        .stdout(contains("900.00"));

    assert!(home.path().join("journal.json").exists());
    assert!(home.path().join("config.json").exists());
}

#[test]
fn adding_account_outside_range_fails() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["add-account", "2600", "assets", "Wrong", "Place"])
        .assert()
        .failure()
        .stderr(contains("1000-1999"));
    cli(home.path())
        .args(["add-account", "1600", "assets", "Company", "Vehicles"])
        .assert()
        .success()
        .stdout(contains("1600 - Company Vehicles"));
    cli(home.path())
        .args(["search", "vehicles"])
        .assert()
        .success()
        .stdout(contains("1600 - Company Vehicles"));
}

#[test]
fn export_then_import_into_another_home() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    let export = source.path().join("export.json");

    cli(source.path())
        .args(["set", "2024-11", "pl", "rent", "800"])
        .assert()
        .success();
    cli(source.path())
        .args(["export", export.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Exported journal"));
    let text = fs::read_to_string(&export).unwrap();
    assert!(text.contains("\"version\": \"1.0\""));

    cli(target.path())
        .args(["import", export.to_str().unwrap()])
        .assert()
        .success();
    cli(target.path())
        .args(["statements", "2024-11"])
        .assert()
        .success()
        .stdout(contains("800.00"));
}

#[test]
fn register_reports_empty_month() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["register", "2025-01"])
        .assert()
        .success()
        .stdout(contains("No register entries"))
        .stdout(contains("Register reconciled"));
}

#[test]
fn backups_are_created_and_listed() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["backup", "month", "end"])
        .assert()
        .success()
        .stdout(contains("_month-end.json"));
    cli(home.path())
        .arg("backups")
        .assert()
        .success()
        .stdout(contains("_month-end.json"));
}

#[test]
fn rejected_set_keeps_remembered_month() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["set", "2025-03", "bs", "cash", "100"])
        .assert()
        .success();
    cli(home.path())
        .args(["set", "2024-01", "bs", "bogus-slot", "5"])
        .assert()
        .failure();
    cli(home.path())
        .arg("statements")
        .assert()
        .success()
        .stdout(contains("March 2025"));
}

#[test]
fn register_entries_are_added_edited_and_removed() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["forward", "2025-03", "1000"])
        .assert()
        .success()
        .stdout(contains("1000.00"));
    cli(home.path())
        .args([
            "entry-add",
            "2025-03",
            "date=2025-03-05",
            "payee=Landlord",
            "check-number=101",
            "check=250",
            "other=250",
            "gl1=6020",
        ])
        .assert()
        .success()
        .stdout(contains("Added register line 1"));
    cli(home.path())
        .args(["deposit", "2025-03", "900"])
        .assert()
        .success();

    cli(home.path())
        .args(["register", "2025-03"])
        .assert()
        .success()
        .stdout(contains("Landlord"))
        .stdout(contains("1000.00"))
        .stdout(contains("-100.00"))
        .stdout(contains("Register reconciled"));

    let saved = fs::read_to_string(home.path().join("journal.json")).unwrap();
    assert!(saved.contains("Rent Expense"));

    cli(home.path())
        .args(["entry-edit", "2025-03", "1", "check=300"])
        .assert()
        .success();
    cli(home.path())
        .args(["register", "2025-03"])
        .assert()
        .success()
        .stdout(contains("not reconciled"));

    cli(home.path())
        .args(["entry-remove", "2025-03", "1"])
        .assert()
        .success()
        .stdout(contains("Landlord"));
    cli(home.path())
        .args(["register", "2025-03"])
        .assert()
        .success()
        .stdout(contains("No register entries"));
}

#[test]
fn register_commands_reject_bad_input() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["entry-add", "2025-03", "gl1=9998"])
        .assert()
        .failure()
        .stderr(contains("9998"));
    cli(home.path())
        .args(["entry-add", "2025-03", "color=blue"])
        .assert()
        .failure()
        .stderr(contains("unknown field `color`"));
    cli(home.path())
        .args(["entry-add", "2025-03", "date=05/03/2025"])
        .assert()
        .failure()
        .stderr(contains("YYYY-MM-DD"));
    cli(home.path())
        .args(["entry-remove", "2025-03", "1"])
        .assert()
        .failure()
        .stderr(contains("not found"));
    cli(home.path())
        .args(["entry-edit", "2025-03", "0", "payee=Nobody"])
        .assert()
        .failure();
}

#[test]
fn line_items_can_be_tagged_and_untagged() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["tag", "2025-03", "pl", "rent", "6020"])
        .assert()
        .failure()
        .stderr(contains("no amount"));
    cli(home.path())
        .args(["set", "2025-03", "pl", "rent", "800"])
        .assert()
        .success();
    cli(home.path())
        .args(["tag", "2025-03", "pl", "rent", "6020"])
        .assert()
        .success()
        .stdout(contains("6020 - Rent Expense"));
    let saved = fs::read_to_string(home.path().join("journal.json")).unwrap();
    assert!(saved.contains("\"glAccount\": \"6020\""));

    cli(home.path())
        .args(["tag", "2025-03", "pl", "rent"])
        .assert()
        .success()
        .stdout(contains("Cleared the GL tag"));
}

#[test]
fn edit_account_renames_existing_account() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["edit-account", "6020", "expenses", "Office", "Rent"])
        .assert()
        .success()
        .stdout(contains("6020 - Office Rent"));
    cli(home.path())
        .args(["search", "office"])
        .assert()
        .success()
        .stdout(contains("6020 - Office Rent"));
    cli(home.path())
        .args(["edit-account", "6999", "expenses", "Missing"])
        .assert()
        .failure()
        .stderr(contains("6999"));
}
