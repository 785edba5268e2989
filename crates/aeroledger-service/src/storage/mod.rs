//! Storage abstraction for the ledger service
//!
//! This module provides a trait-based abstraction over a hosted `Ledger`,
//! enabling both in-memory (default) and persistent (PostgreSQL) backends.
//!
//! Every backend serializes writers: a command is validated and applied under
//! one exclusive lock, so commands take effect in a single global order and
//! readers never observe a half-applied command.

#[cfg(any(feature = "postgres", test))]
mod detached;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use aeroledger_core::{
    Address, Command, CustodyRecord, JournalEntry, Ledger, LedgerError, MaintenanceRecord, Part,
    PartId, Stakeholder,
};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The ledger rejected the call
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Journal is administered by {stored}, configured admin is {configured}")]
    AdminMismatch { stored: String, configured: String },

    #[error("Ledger lock poisoned")]
    LockPoisoned,

    #[error("Commit task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Summary counters for readiness reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub admin: Address,
    pub stakeholder_count: usize,
    pub part_count: u64,
    pub last_seq: u64,
}

/// A page of the journal read in one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPage {
    pub events: Vec<JournalEntry>,
    /// Newest sequence number in the journal when the page was read
    pub last_seq: u64,
}

impl EventPage {
    /// Up to `limit` entries of `ledger` after `since`
    pub fn read(ledger: &Ledger, since: u64, limit: usize) -> Self {
        Self {
            events: ledger.events_since(since).iter().take(limit).cloned().collect(),
            last_seq: ledger.last_seq(),
        }
    }
}

/// Storage backend trait for a hosted ledger
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait LedgerStore: Send + Sync + Debug {
    // =========================================================================
    // Mutation
    // =========================================================================

    /// Validate and apply one command from `caller`
    ///
    /// Either the command fully applies and its journal entry is returned,
    /// or nothing changes.
    async fn execute(&self, caller: &Address, command: Command)
        -> Result<JournalEntry, StorageError>;

    // =========================================================================
    // Registry
    // =========================================================================

    async fn get_stakeholder(&self, identity: &Address)
        -> Result<Option<Stakeholder>, StorageError>;

    // =========================================================================
    // Parts
    // =========================================================================

    async fn get_part(&self, id: PartId) -> Result<Part, StorageError>;

    async fn get_stakeholder_parts(&self, identity: &Address) -> Result<Vec<PartId>, StorageError>;

    async fn verify_authenticity(&self, caller: &Address, id: PartId) -> Result<bool, StorageError>;

    // =========================================================================
    // History
    // =========================================================================

    async fn get_custody_history(&self, id: PartId) -> Result<Vec<CustodyRecord>, StorageError>;

    async fn get_maintenance_history(&self, id: PartId)
        -> Result<Vec<MaintenanceRecord>, StorageError>;

    // =========================================================================
    // Journal
    // =========================================================================

    /// Up to `limit` journal entries with a sequence number greater than
    /// `since`, together with the journal head at the same instant
    async fn events_since(&self, since: u64, limit: usize) -> Result<EventPage, StorageError>;

    async fn stats(&self) -> Result<LedgerStats, StorageError>;
}
