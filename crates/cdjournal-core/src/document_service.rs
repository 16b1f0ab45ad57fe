use cdjournal_domain::{finite_or_zero, parse_amount, Document, LineItem, Period, StatementKind};
use tracing::{debug, warn};

use crate::{CoreError, ServiceResult};

/// Counts of what [`DocumentService::prune`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub zero_line_items: usize,
    pub blank_entries: usize,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.zero_line_items == 0 && self.blank_entries == 0
    }
}

/// Statement line-item mutations and whole-document housekeeping.
pub struct DocumentService;

impl DocumentService {
    /// Writes `amount` into `slot`. A zero (or non-finite) amount removes the slot instead.
    pub fn set_line_item(
        document: &mut Document,
        period: Period,
        kind: StatementKind,
        slot: &str,
        amount: f64,
        gl_account: Option<String>,
    ) -> ServiceResult<()> {
        Self::ensure_slot(kind, slot)?;
        let item = LineItem::new(finite_or_zero(amount)).with_gl_account(gl_account);
        if let Some(number) = item.gl_account.as_deref() {
            Self::ensure_account(document, number)?;
        }
        if item.is_zero() {
            if document.line_items(period, kind).is_some() {
                document.line_items_mut(period, kind).remove(slot);
            }
            return Ok(());
        }
        debug!(%period, %kind, slot, amount, "setting line item");
        document.line_items_mut(period, kind).insert(slot.to_string(), item);
        Ok(())
    }

    /// Like [`Self::set_line_item`] but takes the amount as typed; unparseable text is zero.
    pub fn set_line_item_text(
        document: &mut Document,
        period: Period,
        kind: StatementKind,
        slot: &str,
        raw_amount: &str,
        gl_account: Option<String>,
    ) -> ServiceResult<()> {
        let amount = parse_amount(raw_amount);
        Self::set_line_item(document, period, kind, slot, amount, gl_account)
    }

    /// Changes only the GL tag of an existing line item. `None` clears it.
    pub fn tag_line_item(
        document: &mut Document,
        period: Period,
        kind: StatementKind,
        slot: &str,
        gl_account: Option<String>,
    ) -> ServiceResult<()> {
        Self::ensure_slot(kind, slot)?;
        let current = document
            .line_items(period, kind)
            .and_then(|items| items.get(slot))
            .cloned()
            .ok_or_else(|| {
                CoreError::InvalidOperation(format!("{slot} has no amount in {period}"))
            })?;
        let updated = current.with_gl_account(gl_account);
        if let Some(number) = updated.gl_account.as_deref() {
            Self::ensure_account(document, number)?;
        }
        document
            .line_items_mut(period, kind)
            .insert(slot.to_string(), updated);
        Ok(())
    }

    pub fn line_item<'a>(
        document: &'a Document,
        period: Period,
        kind: StatementKind,
        slot: &str,
    ) -> Option<&'a LineItem> {
        document.line_items(period, kind)?.get(slot)
    }

    /// Drops zero line items and blank journal rows. Month records themselves stay.
    pub fn prune(document: &mut Document) -> PruneReport {
        let mut report = PruneReport::default();
        for year in document.years.values_mut() {
            for months in [&mut year.balance_sheet, &mut year.profit_loss] {
                for items in months.values_mut() {
                    let before = items.len();
                    items.retain(|_, item| !item.is_zero());
                    report.zero_line_items += before - items.len();
                }
            }
            for record in year.journal_entries.values_mut() {
                report.blank_entries += record.retain_populated();
            }
        }
        if !report.is_empty() {
            debug!(?report, "pruned document");
        }
        report
    }

    /// Lists GL references that no longer resolve. These are informational only.
    pub fn warnings(document: &Document) -> Vec<String> {
        let known = &document.gl_accounts;
        let mut warnings = Vec::new();

        for data in document.years.values() {
            for kind in [StatementKind::BalanceSheet, StatementKind::ProfitLoss] {
                for (month, items) in data.statement(kind) {
                    for (slot, item) in items {
                        if let Some(number) = item.gl_account.as_deref() {
                            if !known.contains_key(number) {
                                warnings.push(format!(
                                    "{month} {kind} slot {slot} references unknown GL account {number}"
                                ));
                            }
                        }
                    }
                }
            }
            for (month, record) in &data.journal_entries {
                for (index, entry) in record.entries.iter().enumerate() {
                    for (column, distribution) in entry.populated_distributions() {
                        let number = distribution.gl_number.as_str();
                        if !number.is_empty() && !known.contains_key(number) {
                            warnings.push(format!(
                                "{month} journal line {} distribution {} references unknown GL account {number}",
                                index + 1,
                                column + 1
                            ));
                        }
                    }
                }
            }
        }

        for message in &warnings {
            warn!("{message}");
        }
        warnings
    }

    fn ensure_slot(kind: StatementKind, slot: &str) -> ServiceResult<()> {
        if kind.has_slot(slot) {
            Ok(())
        } else {
            Err(CoreError::InvalidOperation(format!(
                "`{slot}` is not a {kind} line"
            )))
        }
    }

    fn ensure_account(document: &Document, number: &str) -> ServiceResult<()> {
        if document.gl_accounts.contains_key(number) {
            Ok(())
        } else {
            Err(CoreError::AccountNotFound(number.to_string()))
        }
    }
}
