use cdjournal_domain::{amounts_match, finite_or_zero, Document, JournalEntry, JournalRecord, Period};
use tracing::debug;

use crate::{CoreError, ServiceResult};

/// Derived figures for one register line.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRow {
    /// 1-based position label. Recomputed on every pass, never stored.
    pub line_number: usize,
    pub horizontal_proof: f64,
    pub running_balance: f64,
    /// Whether the horizontal proof equals the check amount.
    pub proof_matches: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReconciliationStatus {
    Reconciled,
    Unreconciled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterReport {
    pub rows: Vec<RegisterRow>,
    pub total_check_amount: f64,
    pub total_other_receipts: f64,
    pub total_ar_deposit: f64,
    pub total_bs_deposit: f64,
    pub total_distribution: f64,
    /// `total_check_amount - total_distribution`, signed.
    pub balance_check: f64,
    pub status: ReconciliationStatus,
    pub final_book_balance: f64,
    /// Bank statement figure minus final book balance. Diagnostic only.
    pub dif: f64,
}

impl RegisterReport {
    pub fn is_reconciled(&self) -> bool {
        self.status == ReconciliationStatus::Reconciled
    }
}

/// Check register engine and entry mutations.
pub struct RegisterService;

impl RegisterService {
    /// Single pass over the entries in stored order.
    pub fn compute(record: &JournalRecord) -> RegisterReport {
        let mut running = record.balance_brought_forward;
        let mut total_check_amount = 0.0;
        let mut total_other_receipts = 0.0;
        let mut total_ar_deposit = 0.0;
        let mut total_bs_deposit = 0.0;
        let mut rows = Vec::with_capacity(record.entries.len());

        for (index, entry) in record.entries.iter().enumerate() {
            let horizontal_proof = entry.horizontal_proof();
            running = running - entry.check_amount
                + entry.other_pl_receipts
                + entry.ar_deposit_amount
                + entry.balance_sheet_deposit;
            total_check_amount += entry.check_amount;
            total_other_receipts += entry.other_pl_receipts;
            total_ar_deposit += entry.ar_deposit_amount;
            total_bs_deposit += entry.balance_sheet_deposit;
            rows.push(RegisterRow {
                line_number: index + 1,
                horizontal_proof,
                running_balance: running,
                proof_matches: amounts_match(horizontal_proof, entry.check_amount),
            });
        }

        let total_distribution = total_other_receipts + total_ar_deposit + total_bs_deposit;
        let balance_check = total_check_amount - total_distribution;
        let status = if amounts_match(balance_check, 0.0) {
            ReconciliationStatus::Reconciled
        } else {
            ReconciliationStatus::Unreconciled
        };

        RegisterReport {
            rows,
            total_check_amount,
            total_other_receipts,
            total_ar_deposit,
            total_bs_deposit,
            total_distribution,
            balance_check,
            status,
            final_book_balance: running,
            dif: record.citizen_statement_deposit - running,
        }
    }

    pub fn for_period(document: &Document, period: Period) -> RegisterReport {
        debug!(%period, "recomputing check register");
        match document.journal(period) {
            Some(record) => Self::compute(record),
            None => Self::compute(&JournalRecord::default()),
        }
    }

    /// Appends `entry` at the end of the month's register and returns its line number.
    pub fn append_entry(document: &mut Document, period: Period, mut entry: JournalEntry) -> usize {
        entry.sanitize_amounts();
        document.journal_mut(period).push(entry)
    }

    /// Removes the entry at 0-based `index`. Later entries move up one line.
    pub fn remove_entry(
        document: &mut Document,
        period: Period,
        index: usize,
    ) -> ServiceResult<JournalEntry> {
        if document.journal(period).is_none() {
            return Err(CoreError::EntryNotFound(index));
        }
        document
            .journal_mut(period)
            .remove(index)
            .ok_or(CoreError::EntryNotFound(index))
    }

    /// Applies `change` to the entry at 0-based `index`.
    pub fn update_entry<F>(
        document: &mut Document,
        period: Period,
        index: usize,
        change: F,
    ) -> ServiceResult<()>
    where
        F: FnOnce(&mut JournalEntry),
    {
        if document.journal(period).is_none() {
            return Err(CoreError::EntryNotFound(index));
        }
        let entry = document
            .journal_mut(period)
            .entries
            .get_mut(index)
            .ok_or(CoreError::EntryNotFound(index))?;
        change(entry);
        entry.sanitize_amounts();
        Ok(())
    }

    pub fn set_balance_brought_forward(document: &mut Document, period: Period, amount: f64) {
        document.journal_mut(period).balance_brought_forward = finite_or_zero(amount);
    }

    /// Records the deposit figure from the bank statement.
    pub fn set_statement_deposit(document: &mut Document, period: Period, amount: f64) {
        document.journal_mut(period).citizen_statement_deposit = finite_or_zero(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(check: f64, other: f64, ar: f64, bs: f64) -> JournalEntry {
        JournalEntry {
            check_amount: check,
            other_pl_receipts: other,
            ar_deposit_amount: ar,
            balance_sheet_deposit: bs,
            ..JournalEntry::default()
        }
    }

    #[test]
    fn empty_register_keeps_brought_forward() {
        let mut record = JournalRecord::new(250.0);
        record.citizen_statement_deposit = 300.0;
        let report = RegisterService::compute(&record);
        assert!(report.rows.is_empty());
        assert_eq!(report.final_book_balance, 250.0);
        assert_eq!(report.dif, 50.0);
        assert!(report.is_reconciled());
    }

    #[test]
    fn running_balance_follows_stored_order() {
        let mut record = JournalRecord::new(100.0);
        record.push(entry(50.0, 0.0, 0.0, 0.0));
        record.push(entry(0.0, 30.0, 0.0, 0.0));
        let report = RegisterService::compute(&record);
        let balances: Vec<f64> = report.rows.iter().map(|row| row.running_balance).collect();
        assert_eq!(balances, vec![50.0, 80.0]);
        assert!(!report.rows[0].proof_matches);
        assert_eq!(report.balance_check, 20.0);
        assert_eq!(report.status, ReconciliationStatus::Unreconciled);
    }

    #[test]
    fn update_and_remove_report_missing_positions() {
        let mut document = Document::new();
        let period = Period::new(2025, 1).unwrap();
        assert!(matches!(
            RegisterService::remove_entry(&mut document, period, 0),
            Err(CoreError::EntryNotFound(0))
        ));
        assert!(document.journal(period).is_none());

        RegisterService::append_entry(&mut document, period, entry(10.0, 10.0, 0.0, 0.0));
        RegisterService::update_entry(&mut document, period, 0, |e| e.payee = "Acme".into())
            .expect("update");
        assert_eq!(document.journal(period).unwrap().entries[0].payee, "Acme");
        assert!(RegisterService::update_entry(&mut document, period, 3, |_| {}).is_err());
    }

    #[test]
    fn non_finite_register_amounts_are_stored_as_zero() {
        let mut document = Document::new();
        let period = Period::new(2025, 1).unwrap();
        RegisterService::set_balance_brought_forward(&mut document, period, f64::NAN);
        RegisterService::set_statement_deposit(&mut document, period, f64::INFINITY);
        RegisterService::append_entry(&mut document, period, entry(f64::NAN, 5.0, 0.0, 0.0));
        RegisterService::update_entry(&mut document, period, 0, |e| {
            e.balance_sheet_deposit = f64::NEG_INFINITY
        })
        .expect("update");

        let report = RegisterService::for_period(&document, period);
        assert_eq!(report.total_check_amount, 0.0);
        assert_eq!(report.total_bs_deposit, 0.0);
        assert_eq!(report.final_book_balance, 5.0);
        assert_eq!(report.dif, -5.0);
    }
}
