//! # AeroLedger Core
//!
//! Provenance ledger for aviation parts moving between manufacturers,
//! airlines, maintenance organizations (MROs) and regulators.
//!
//! ## Key Concepts
//!
//! - **Stakeholder**: a registered participant with a fixed role
//! - **Part**: a tracked item with immutable manufacture metadata, a current
//!   owner and a status
//! - **Custody log**: append-only record of ownership changes per part
//! - **Maintenance log**: append-only record of MRO service actions per part
//! - **Journal**: ordered `LedgerEvent`s describing every mutation
//!
//! ## Invariants
//!
//! 1. A stakeholder identity is registered at most once and its role never changes
//! 2. Part ids are assigned sequentially from 1 and never reused
//! 3. History records are immutable once appended, in call order
//! 4. Every mutation passes its access guard first; rejected calls change nothing
//! 5. A part's current owner is always a registered, active stakeholder

pub mod access;
pub mod command;
pub mod error;
pub mod event;
pub mod ledger;
pub mod types;

pub use command::Command;
pub use error::{ErrorKind, LedgerError, Result};
pub use event::{JournalEntry, LedgerEvent};
pub use ledger::{Ledger, ValidatedEvent};
pub use types::{
    Address, CustodyRecord, MaintenanceRecord, Part, PartId, PartStatus, Role, Stakeholder,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
