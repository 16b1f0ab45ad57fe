use std::path::{Path, PathBuf};

use cdjournal_domain::Document;

use crate::CoreError;

/// Describes a persisted backup of the journal document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing the journal document.
pub trait DocumentStorage: Send + Sync {
    /// Returns the saved document, or `None` when nothing usable is stored.
    fn load_document(&self) -> Result<Option<Document>, CoreError>;
    fn save_document(&self, document: &Document) -> Result<(), CoreError>;
    fn save_document_to_path(&self, document: &Document, path: &Path) -> Result<(), CoreError>;
    fn load_document_from_path(&self, path: &Path) -> Result<Document, CoreError>;
    fn backup_document(
        &self,
        document: &Document,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError>;
    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BackupInfo) -> Result<Document, CoreError>;
}
