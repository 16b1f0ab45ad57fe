//! cdjournal-domain
//!
//! Pure domain models for the CD Journal (GL accounts, statement line items, periods,
//! check-register records and the persisted document).
//! No I/O, no CLI, no storage. Only data types and their JSON shape.

pub mod common;
pub mod document;
pub mod gl_account;
pub mod journal;
pub mod line_item;
pub mod period;
pub mod slots;

pub use common::*;
pub use document::*;
pub use gl_account::*;
pub use journal::*;
pub use line_item::*;
pub use period::*;
pub use slots::StatementKind;
