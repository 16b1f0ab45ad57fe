use std::result::Result as StdResult;

use cdjournal_config::ConfigError as JournalConfigError;
use cdjournal_core::CoreError;
use cdjournal_domain::PeriodError;
use thiserror::Error;

/// Unified error type for the domain, service, storage and config layers.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Bad format: {0}")]
    BadFormat(String),
    #[error("{0}")]
    OutOfRange(String),
    #[error("Account number already exists: {0}")]
    DuplicateKey(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Journal entry not found at position {0}")]
    EntryNotFound(usize),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, JournalError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] JournalError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for JournalError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BadFormat(message) => JournalError::BadFormat(message),
            out_of_range @ CoreError::OutOfRange { .. } => {
                JournalError::OutOfRange(out_of_range.to_string())
            }
            CoreError::DuplicateKey(number) => JournalError::DuplicateKey(number),
            CoreError::AccountNotFound(number) => JournalError::AccountNotFound(number),
            CoreError::EntryNotFound(index) => JournalError::EntryNotFound(index),
            CoreError::InvalidOperation(message) => JournalError::InvalidInput(message),
            CoreError::Storage(message) => JournalError::StorageFailure(message),
            CoreError::Serde(err) => JournalError::StorageFailure(err.to_string()),
            CoreError::Io(err) => JournalError::StorageFailure(err.to_string()),
        }
    }
}

impl From<JournalConfigError> for JournalError {
    fn from(err: JournalConfigError) -> Self {
        match err {
            JournalConfigError::Io(io) => JournalError::StorageFailure(io.to_string()),
            JournalConfigError::Serde(message) => JournalError::ConfigError(message),
        }
    }
}

impl From<PeriodError> for JournalError {
    fn from(err: PeriodError) -> Self {
        JournalError::InvalidInput(err.to_string())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::StorageFailure(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(JournalError::from(err))
    }
}

impl From<JournalConfigError> for CliError {
    fn from(err: JournalConfigError) -> Self {
        CliError::from(JournalError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::from(JournalError::from(err))
    }
}
