#![doc(test(attr(deny(warnings))))]

//! CD Journal keeps monthly balance sheets, profit & loss statements and a check
//! register per business month, with a chart of GL accounts shared across years.
//!
//! The domain types, services, JSON storage and configuration live in the workspace
//! crates and are re-exported here for the CLI and for embedders.

pub mod cli;
pub mod errors;
pub mod session;
pub mod utils;

pub use errors::{CliError, JournalError};
pub use session::{JournalSession, SessionOptions};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("CD Journal tracing initialized.");
    });
}
