use cdjournal_domain::{Displayable, Document, GlAccount, GlAccountType, GL_NUMBER_LEN};
use tracing::debug;

use crate::{CoreError, ServiceResult};

/// Distinguishes a brand-new account from an edit of an existing number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Create,
    Edit,
}

/// Chart-of-accounts operations over a [`Document`].
pub struct GlAccountService;

impl GlAccountService {
    /// Checks the 4-digit format first, then the numeric band of `account_type`.
    pub fn validate(number: &str, account_type: GlAccountType) -> ServiceResult<()> {
        if number.len() != GL_NUMBER_LEN || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::BadFormat(format!(
                "account number `{number}` must be {GL_NUMBER_LEN} digits"
            )));
        }
        let numeric: u16 = number
            .parse()
            .map_err(|_| CoreError::BadFormat(format!("account number `{number}` is not numeric")))?;
        if !account_type.contains(numeric) {
            let (min, max) = account_type.range();
            return Err(CoreError::OutOfRange {
                number: number.to_string(),
                account_type,
                min,
                max,
            });
        }
        Ok(())
    }

    pub fn upsert(document: &mut Document, account: GlAccount, mode: UpsertMode) -> ServiceResult<()> {
        Self::validate(&account.number, account.account_type)?;
        let exists = document.gl_accounts.contains_key(&account.number);
        match mode {
            UpsertMode::Create if exists => {
                return Err(CoreError::DuplicateKey(account.number));
            }
            UpsertMode::Edit if !exists => {
                return Err(CoreError::AccountNotFound(account.number));
            }
            _ => {}
        }
        debug!(number = %account.number, ?mode, "upserting GL account");
        document.gl_accounts.insert(account.number.clone(), account);
        Ok(())
    }

    pub fn add(document: &mut Document, account: GlAccount) -> ServiceResult<()> {
        Self::upsert(document, account, UpsertMode::Create)
    }

    /// Replaces the account stored under `number`. The number itself cannot change.
    pub fn edit(document: &mut Document, number: &str, changes: GlAccount) -> ServiceResult<()> {
        if changes.number != number {
            return Err(CoreError::InvalidOperation(format!(
                "account number {number} cannot be changed to {}",
                changes.number
            )));
        }
        Self::upsert(document, changes, UpsertMode::Edit)
    }

    /// Deletes the account. References from line items and journal entries are left dangling.
    pub fn remove(document: &mut Document, number: &str) -> ServiceResult<GlAccount> {
        document
            .gl_accounts
            .remove(number)
            .ok_or_else(|| CoreError::AccountNotFound(number.to_string()))
    }

    pub fn get<'a>(document: &'a Document, number: &str) -> Option<&'a GlAccount> {
        document.gl_accounts.get(number)
    }

    /// All accounts, ascending by number.
    pub fn list(document: &Document) -> Vec<&GlAccount> {
        document.gl_accounts.values().collect()
    }

    pub fn by_type(document: &Document, account_type: GlAccountType) -> Vec<&GlAccount> {
        document
            .gl_accounts
            .values()
            .filter(|account| account.account_type == account_type)
            .collect()
    }

    /// Case-insensitive match on number or name. A blank term lists everything.
    pub fn search<'a>(document: &'a Document, term: &str) -> Vec<&'a GlAccount> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Self::list(document);
        }
        document
            .gl_accounts
            .values()
            .filter(|account| {
                account.number.contains(&needle) || account.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// `"NNNN - Name"` for a known number; `None` for unknown or dangling references.
    pub fn label(document: &Document, number: &str) -> Option<String> {
        Self::get(document, number).map(GlAccount::display_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_format_before_range() {
        assert!(GlAccountService::validate("1500", GlAccountType::Assets).is_ok());
        assert!(matches!(
            GlAccountService::validate("150", GlAccountType::Liabilities),
            Err(CoreError::BadFormat(_))
        ));
        assert!(matches!(
            GlAccountService::validate("15a0", GlAccountType::Assets),
            Err(CoreError::BadFormat(_))
        ));
    }

    #[test]
    fn out_of_range_message_names_expected_band() {
        let err = GlAccountService::validate("1500", GlAccountType::Liabilities)
            .expect_err("wrong band");
        let message = err.to_string();
        assert!(message.contains("2000-2999"), "unexpected: {message}");
        assert!(message.contains("liabilities"), "unexpected: {message}");
    }

    #[test]
    fn expenses_band_reaches_9999() {
        assert!(GlAccountService::validate("9999", GlAccountType::Expenses).is_ok());
        assert!(GlAccountService::validate("4999", GlAccountType::Expenses).is_err());
    }

    #[test]
    fn edit_cannot_rename_number() {
        let mut document = Document::new();
        let changes = GlAccount::new("1011", "Cash", GlAccountType::Assets);
        let err = GlAccountService::edit(&mut document, "1010", changes).expect_err("rename");
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }
}
