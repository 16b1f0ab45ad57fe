#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use cdjournal::{JournalSession, SessionOptions};
use cdjournal_core::FixedClock;
use cdjournal_domain::Period;
use cdjournal_storage_json::{JsonDocumentStorage, StoragePaths};
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn march_2025() -> Period {
    Period::new(2025, 3).expect("period")
}

pub fn storage_at(base: &Path) -> Arc<JsonDocumentStorage> {
    Arc::new(JsonDocumentStorage::new(StoragePaths::under(base)).expect("create json storage"))
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap(),
    ))
}

/// Opens a session on March 2025 over storage in `base`.
pub fn open_session(base: &Path, autosave: bool) -> JournalSession {
    let options = SessionOptions {
        autosave,
        start: Some(march_2025()),
        ..SessionOptions::default()
    };
    JournalSession::open_with_clock(storage_at(base), options, clock()).expect("open session")
}

/// Isolated session with autosave enabled.
pub fn setup_session() -> (JournalSession, PathBuf) {
    let base = test_dir();
    let session = open_session(&base, true);
    (session, base)
}
