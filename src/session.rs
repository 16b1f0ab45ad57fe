//! Explicit session state: the in-memory document, the month being viewed and the
//! storage it is persisted to.

use std::sync::Arc;

use cdjournal_core::{
    BackupInfo, Clock, DocumentService, DocumentStorage, GlAccountService, PruneReport,
    RegisterReport, RegisterService, StatementService, StatementTotals, SummaryService,
    SystemClock, TransferService, UpsertMode, YearSummary,
};
use cdjournal_domain::{
    Document, GlAccount, JournalEntry, MonthRecord, Period, StatementKind, MONTHS_PER_YEAR,
};
use tracing::{debug, info, warn};

use crate::errors::{JournalError, Result};

/// How a session starts and whether it writes through on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub autosave: bool,
    pub seed_default_accounts: bool,
    /// Month to open; defaults to the clock's current month.
    pub start: Option<Period>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autosave: true,
            seed_default_accounts: true,
            start: None,
        }
    }
}

/// Owns the journal document for the lifetime of one user session.
///
/// Every mutation completes on `&mut self` before any derivation can borrow the document,
/// so derived totals always observe a fully updated state.
pub struct JournalSession {
    document: Document,
    storage: Option<Arc<dyn DocumentStorage>>,
    clock: Arc<dyn Clock>,
    period: Period,
    autosave: bool,
    storage_error: Option<String>,
}

impl JournalSession {
    /// In-memory session without persistence.
    pub fn new(document: Document) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let period = Period::containing(clock.today());
        Self {
            document,
            storage: None,
            clock,
            period,
            autosave: false,
            storage_error: None,
        }
    }

    /// Loads the stored document, or starts a fresh one when nothing usable is stored.
    pub fn open(storage: Arc<dyn DocumentStorage>, options: SessionOptions) -> Result<Self> {
        Self::open_with_clock(storage, options, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        storage: Arc<dyn DocumentStorage>,
        options: SessionOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let document = match storage.load_document()? {
            Some(document) => document,
            None if options.seed_default_accounts => {
                info!("no stored journal; starting with the default chart of accounts");
                Document::new()
            }
            None => Document::default(),
        };
        let period = options
            .start
            .unwrap_or_else(|| Period::containing(clock.today()));
        let session = Self {
            document,
            storage: Some(storage),
            clock,
            period,
            autosave: options.autosave,
            storage_error: None,
        };
        // Logged by the service; dangling references never block opening.
        session.warnings();
        Ok(session)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn year(&self) -> i32 {
        self.period.year()
    }

    /// Month being viewed, counted from 0 (January).
    pub fn month_index(&self) -> u32 {
        self.period.month_index()
    }

    pub fn go_to(&mut self, period: Period) {
        debug!(%period, "switching period");
        self.period = period;
    }

    /// Selects a month of the current year by 0-based index.
    pub fn select_month(&mut self, month_index: u32) -> Result<()> {
        if month_index >= MONTHS_PER_YEAR {
            return Err(JournalError::InvalidInput(format!(
                "month index {month_index} is outside 0-11"
            )));
        }
        let period = Period::from_zero_based(self.year(), month_index)?;
        self.go_to(period);
        Ok(())
    }

    pub fn select_year(&mut self, year: i32) -> Result<()> {
        let period = self.period.with_year(year)?;
        self.go_to(period);
        Ok(())
    }

    /// Steps forward one month, rolling into January of the next year after December.
    pub fn next_month(&mut self) {
        self.go_to(self.period.next());
    }

    pub fn previous_month(&mut self) {
        self.go_to(self.period.previous());
    }

    pub fn month_record(&self) -> MonthRecord {
        self.document.month_record(self.period)
    }

    pub fn set_line_item(
        &mut self,
        kind: StatementKind,
        slot: &str,
        amount: f64,
        gl_account: Option<String>,
    ) -> Result<()> {
        DocumentService::set_line_item(
            &mut self.document,
            self.period,
            kind,
            slot,
            amount,
            gl_account,
        )?;
        self.changed();
        Ok(())
    }

    /// Sets a line item from typed text; anything unparseable is treated as zero.
    pub fn set_line_item_text(
        &mut self,
        kind: StatementKind,
        slot: &str,
        raw_amount: &str,
        gl_account: Option<String>,
    ) -> Result<()> {
        DocumentService::set_line_item_text(
            &mut self.document,
            self.period,
            kind,
            slot,
            raw_amount,
            gl_account,
        )?;
        self.changed();
        Ok(())
    }

    pub fn tag_line_item(
        &mut self,
        kind: StatementKind,
        slot: &str,
        gl_account: Option<String>,
    ) -> Result<()> {
        DocumentService::tag_line_item(&mut self.document, self.period, kind, slot, gl_account)?;
        self.changed();
        Ok(())
    }

    pub fn upsert_account(&mut self, account: GlAccount, mode: UpsertMode) -> Result<()> {
        GlAccountService::upsert(&mut self.document, account, mode)?;
        self.changed();
        Ok(())
    }

    pub fn remove_account(&mut self, number: &str) -> Result<GlAccount> {
        let removed = GlAccountService::remove(&mut self.document, number)?;
        self.changed();
        Ok(removed)
    }

    /// Appends a register row to the current month; returns its line number.
    pub fn add_entry(&mut self, entry: JournalEntry) -> usize {
        let line = RegisterService::append_entry(&mut self.document, self.period, entry);
        self.changed();
        line
    }

    /// Deletes the register row at 0-based `index`.
    pub fn remove_entry(&mut self, index: usize) -> Result<JournalEntry> {
        let removed = RegisterService::remove_entry(&mut self.document, self.period, index)?;
        self.changed();
        Ok(removed)
    }

    pub fn update_entry<F>(&mut self, index: usize, change: F) -> Result<()>
    where
        F: FnOnce(&mut JournalEntry),
    {
        RegisterService::update_entry(&mut self.document, self.period, index, change)?;
        self.changed();
        Ok(())
    }

    pub fn set_balance_brought_forward(&mut self, amount: f64) {
        RegisterService::set_balance_brought_forward(&mut self.document, self.period, amount);
        self.changed();
    }

    pub fn set_statement_deposit(&mut self, amount: f64) {
        RegisterService::set_statement_deposit(&mut self.document, self.period, amount);
        self.changed();
    }

    pub fn statements(&self) -> StatementTotals {
        StatementService::for_period(&self.document, self.period)
    }

    pub fn register(&self) -> RegisterReport {
        RegisterService::for_period(&self.document, self.period)
    }

    pub fn year_summary(&self) -> YearSummary {
        SummaryService::year_to_date(&self.document, self.year())
    }

    pub fn warnings(&self) -> Vec<String> {
        DocumentService::warnings(&self.document)
    }

    /// Persists a pruned copy of the document. Blank rows stay in memory for editing.
    pub fn save(&self) -> Result<PruneReport> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| JournalError::StorageFailure("session has no storage".into()))?;
        let mut snapshot = self.document.clone();
        let report = DocumentService::prune(&mut snapshot);
        storage.save_document(&snapshot)?;
        Ok(report)
    }

    /// The last autosave failure, cleared once read.
    pub fn take_storage_error(&mut self) -> Option<String> {
        self.storage_error.take()
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(TransferService::export_json(&self.document, self.clock.as_ref())?)
    }

    /// Suggested file name for an export of the year being viewed.
    pub fn export_file_name(&self) -> String {
        TransferService::export_file_name(self.year(), self.clock.today())
    }

    /// Replaces the whole document with the imported one. Nothing changes on error.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let document = TransferService::import_json(text)?;
        self.document = document;
        self.changed();
        self.warnings();
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        let storage = self.require_storage()?;
        Ok(storage.backup_document(&self.document, note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        Ok(self.require_storage()?.list_backups()?)
    }

    pub fn restore_backup(&mut self, backup: &BackupInfo) -> Result<()> {
        let document = self.require_storage()?.restore_backup(backup)?;
        info!(backup = %backup.id, "session restored from backup");
        self.document = document;
        Ok(())
    }

    fn require_storage(&self) -> Result<&Arc<dyn DocumentStorage>> {
        self.storage
            .as_ref()
            .ok_or_else(|| JournalError::StorageFailure("session has no storage".into()))
    }

    // Autosave failures are not fatal: the in-memory document stays authoritative.
    fn changed(&mut self) {
        if !self.autosave || self.storage.is_none() {
            return;
        }
        if let Err(err) = self.save() {
            warn!(error = %err, "autosave failed; changes kept in memory");
            self.storage_error = Some(err.to_string());
        }
    }
}
