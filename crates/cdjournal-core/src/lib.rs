//! cdjournal-core
//!
//! Business logic and services for the CD Journal.
//! Depends on cdjournal-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod document_service;
pub mod error;
pub mod format;
pub mod gl_account_service;
pub mod register_service;
pub mod statement_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transfer;

pub use document_service::*;
pub use error::{CoreError, ServiceResult};
pub use format::*;
pub use gl_account_service::*;
pub use register_service::*;
pub use statement_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::*;
pub use transfer::*;
