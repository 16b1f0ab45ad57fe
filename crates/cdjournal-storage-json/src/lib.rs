use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use cdjournal_core::{
    storage::{BackupInfo, DocumentStorage},
    CoreError,
};
use cdjournal_domain::Document;
use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

const DOCUMENT_STEM: &str = "journal";
const DOCUMENT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Where the document and its backups live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `root/journal.json` with backups in `root/backups`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_root: root.to_path_buf(),
            backup_root: root.join("backups"),
        }
    }
}

/// Filesystem-backed JSON persistence for the journal document and its backups.
#[derive(Debug, Clone)]
pub struct JsonDocumentStorage {
    document_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonDocumentStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            document_path: paths
                .data_root
                .join(format!("{DOCUMENT_STEM}.{DOCUMENT_EXTENSION}")),
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn delete_backup(&self, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backups_dir.join(backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn write_backup_file(
        &self,
        document: &Document,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = self.next_backup_stamp()?;
        let mut stem = format!("{DOCUMENT_STEM}_{timestamp}");
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let path = self.backups_dir.join(format!("{stem}.{DOCUMENT_EXTENSION}"));
        write_atomic(&path, &serialize_document(document)?)?;
        self.prune_backups()?;
        let id = file_name_of(&path);
        info!(backup = %id, "created backup");
        Ok(BackupInfo {
            id,
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.document_path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = self.next_backup_stamp()?;
        let backup_path = self
            .backups_dir
            .join(format!("{DOCUMENT_STEM}_{timestamp}.{DOCUMENT_EXTENSION}"));
        fs::copy(&self.document_path, &backup_path)?;
        debug!(path = %backup_path.display(), "backed up previous document");
        self.prune_backups()
    }

    /// Backup stamps strictly increase, even for several backups within one millisecond.
    /// Stamps are compared at the millisecond precision they are written with.
    fn next_backup_stamp(&self) -> Result<String, CoreError> {
        let mut stamp = Utc::now().trunc_subsecs(3);
        if let Some((latest, _)) = self.backup_entries()?.first() {
            if *latest >= stamp {
                stamp = *latest + Duration::milliseconds(1);
            }
        }
        Ok(stamp.format(BACKUP_TIMESTAMP_FORMAT).to_string())
    }

    /// Backups with their parsed stamps, newest first.
    fn backup_entries(&self) -> Result<Vec<(DateTime<Utc>, BackupInfo)>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let id = file_name_of(&path);
            let Some(created) = parse_backup_timestamp(&id) else {
                continue;
            };
            entries.push((
                created,
                BackupInfo {
                    created_at: created.format(BACKUP_TIMESTAMP_FORMAT).to_string(),
                    id,
                    path,
                },
            ));
        }
        entries.sort_by_key(|(created, _)| Reverse(*created));
        Ok(entries)
    }

    /// Retention applies to the automatic pre-save copies only; noted backups are kept
    /// until deleted.
    fn prune_backups(&self) -> Result<(), CoreError> {
        let automatic = self
            .list_backups()?
            .into_iter()
            .filter(|entry| !is_noted_backup(&entry.id));
        for entry in automatic.skip(self.retention) {
            debug!(backup = %entry.id, "pruning backup beyond retention");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl DocumentStorage for JsonDocumentStorage {
    fn load_document(&self) -> Result<Option<Document>, CoreError> {
        let data = match fs::read_to_string(&self.document_path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&data) {
            Ok(document) => {
                info!(path = %self.document_path.display(), "loaded journal document");
                Ok(Some(document))
            }
            Err(err) => {
                warn!(
                    path = %self.document_path.display(),
                    error = %err,
                    "stored document is unreadable; starting fresh"
                );
                Ok(None)
            }
        }
    }

    fn save_document(&self, document: &Document) -> Result<(), CoreError> {
        if let Some(parent) = self.document_path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.backup_existing_file()?;
        let tmp = tmp_path(&self.document_path);
        write_atomic(&tmp, &serialize_document(document)?)?;
        fs::rename(&tmp, &self.document_path)?;
        info!(path = %self.document_path.display(), "saved journal document");
        Ok(())
    }

    fn save_document_to_path(&self, document: &Document, path: &Path) -> Result<(), CoreError> {
        if path == self.document_path {
            return self.save_document(document);
        }
        save_document_to_path(document, path)
    }

    fn load_document_from_path(&self, path: &Path) -> Result<Document, CoreError> {
        load_document_from_path(path)
    }

    fn backup_document(
        &self,
        document: &Document,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        self.write_backup_file(document, note)
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        Ok(self
            .backup_entries()?
            .into_iter()
            .map(|(_, info)| info)
            .collect())
    }

    fn restore_backup(&self, backup: &BackupInfo) -> Result<Document, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let document = load_document_from_path(&backup.path)?;
        if let Some(parent) = self.document_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &self.document_path)?;
        info!(backup = %backup.id, "restored backup");
        Ok(document)
    }
}

/// Saves a document to an arbitrary path on disk.
pub fn save_document_to_path(document: &Document, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_document(document)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a document from the provided filesystem path. Unlike
/// [`DocumentStorage::load_document`], a corrupt file is an error here.
pub fn load_document_from_path(path: &Path) -> Result<Document, CoreError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the `YYYYMMDD_HHMMSSmmm` stamp out of `journal_<stamp>[_note].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))?;
    let mut segments = trimmed.split('_');
    if segments.next()? != DOCUMENT_STEM {
        return None;
    }
    let date = segments.next()?;
    let time = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    let (clock, millis) = time.split_at(6);
    let naive = NaiveDateTime::parse_from_str(&format!("{date}{clock}"), "%Y%m%d%H%M%S").ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
}

/// `journal_<date>_<time>_<note>.json`; sanitized notes never contain `_`.
fn is_noted_backup(name: &str) -> bool {
    name.strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))
        .is_some_and(|stem| stem.split('_').count() > 3)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_document(document: &Document) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(document)?)
}
