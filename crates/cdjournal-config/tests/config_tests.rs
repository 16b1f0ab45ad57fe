use cdjournal_config::{Config, ConfigError, ConfigManager};
use std::{fs, path::PathBuf};
use tempfile::tempdir;

#[test]
fn default_config_enables_autosave_and_seeding() {
    let cfg = Config::default();

    assert!(cfg.ui_color_enabled);
    assert!(cfg.autosave);
    assert!(cfg.seed_default_accounts);
    assert_eq!(cfg.backup_retention, 5);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.ui_color_enabled = false;
    cfg.data_dir = Some(PathBuf::from("/srv/books"));
    cfg.last_period = Some("2025-03".to_string());
    cfg.autosave = false;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_dir(), PathBuf::from("/srv/books"));
    assert_eq!(loaded.resolve_backup_dir(), PathBuf::from("/srv/books/backups"));
}

#[test]
fn missing_file_yields_defaults_and_sparse_file_fills_gaps() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");
    assert_eq!(manager.load().expect("defaults"), Config::default());

    fs::write(
        manager.config_path(),
        r#"{"backup_retention": 9, "locale": "pt-PT", "currency": "EUR"}"#,
    )
    .expect("write sparse config");
    let loaded = manager.load().expect("sparse config with unknown keys");
    assert_eq!(loaded.backup_retention, 9);
    assert!(loaded.autosave);
    assert!(loaded.last_period.is_none());
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    fs::write(manager.config_path(), "locale = en").expect("write");
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}
