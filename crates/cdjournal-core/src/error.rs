use cdjournal_domain::GlAccountType;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Bad format: {0}")]
    BadFormat(String),
    #[error("Account number {number} must be in range {min}-{max} for {account_type}")]
    OutOfRange {
        number: String,
        account_type: GlAccountType,
        min: u16,
        max: u16,
    },
    #[error("Account number already exists: {0}")]
    DuplicateKey(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Journal entry not found at position {0}")]
    EntryNotFound(usize),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
