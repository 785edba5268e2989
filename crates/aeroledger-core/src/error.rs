//! Error types for the provenance ledger

use serde::Serialize;
use thiserror::Error;

use crate::types::Address;

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur when operating on the ledger
///
/// Every error is a synchronous rejection of a single call. No state change
/// accompanies an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller failed an admin, role or ownership guard
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Stakeholder identity is already present in the registry
    #[error("Stakeholder already registered: {0}")]
    AlreadyRegistered(Address),

    /// Referenced part or stakeholder does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transfer target is not a registered, active stakeholder
    #[error("Recipient is not a registered active stakeholder: {0}")]
    InvalidRecipient(Address),

    /// Stakeholder still holds parts and cannot be deactivated
    #[error("Stakeholder {identity} still holds {count} part(s)")]
    HoldsParts { identity: Address, count: usize },

    /// A replayed journal entry does not match what the ledger would produce
    #[error("Journal entry {seq} rejected: {reason}")]
    Journal { seq: u64, reason: String },
}

/// Stable, machine-checkable error kind
///
/// Callers branch on this, never on the reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Unauthorized,
    AlreadyRegistered,
    NotFound,
    InvalidRecipient,
    HoldsParts,
    Journal,
}

impl LedgerError {
    /// Get the stable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Unauthorized(_) => ErrorKind::Unauthorized,
            LedgerError::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::InvalidRecipient(_) => ErrorKind::InvalidRecipient,
            LedgerError::HoldsParts { .. } => ErrorKind::HoldsParts,
            LedgerError::Journal { .. } => ErrorKind::Journal,
        }
    }

    pub(crate) fn part_not_found(id: crate::types::PartId) -> Self {
        LedgerError::NotFound(format!("part {}", id))
    }

    pub(crate) fn stakeholder_not_found(identity: &Address) -> Self {
        LedgerError::NotFound(format!("stakeholder {}", identity))
    }
}
