//! In-memory storage backend
//!
//! Default storage implementation holding the ledger behind a single
//! reader-writer lock. Suitable for development and single-instance
//! deployments. Data is lost on restart.

use aeroledger_core::{
    Address, Command, CustodyRecord, JournalEntry, Ledger, MaintenanceRecord, Part, PartId,
    Stakeholder,
};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use super::{EventPage, LedgerStats, LedgerStore, StorageError};

/// In-memory ledger store implementation
#[derive(Debug)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    /// Create a store holding an empty ledger administered by `admin`
    pub fn new(admin: impl Into<Address>) -> Self {
        Self::from_ledger(Ledger::new(admin))
    }

    /// Host an existing ledger
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, StorageError> {
        self.ledger.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, StorageError> {
        self.ledger.write().map_err(|_| StorageError::LockPoisoned)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn execute(
        &self,
        caller: &Address,
        command: Command,
    ) -> Result<JournalEntry, StorageError> {
        let name = command.name();
        let mut ledger = self.write()?;
        ledger.execute(caller, command).map_err(|e| {
            warn!(caller = %caller, command = name, error = %e, "Command rejected");
            StorageError::from(e)
        })
    }

    async fn get_stakeholder(
        &self,
        identity: &Address,
    ) -> Result<Option<Stakeholder>, StorageError> {
        Ok(self.read()?.get_stakeholder(identity).cloned())
    }

    async fn get_part(&self, id: PartId) -> Result<Part, StorageError> {
        Ok(self.read()?.get_part(id)?.clone())
    }

    async fn get_stakeholder_parts(&self, identity: &Address) -> Result<Vec<PartId>, StorageError> {
        Ok(self.read()?.get_stakeholder_parts(identity))
    }

    async fn verify_authenticity(&self, caller: &Address, id: PartId) -> Result<bool, StorageError> {
        Ok(self.read()?.verify_authenticity(caller, id)?)
    }

    async fn get_custody_history(&self, id: PartId) -> Result<Vec<CustodyRecord>, StorageError> {
        Ok(self.read()?.get_custody_history(id)?.to_vec())
    }

    async fn get_maintenance_history(
        &self,
        id: PartId,
    ) -> Result<Vec<MaintenanceRecord>, StorageError> {
        Ok(self.read()?.get_maintenance_history(id)?.to_vec())
    }

    async fn events_since(&self, since: u64, limit: usize) -> Result<EventPage, StorageError> {
        let ledger = self.read()?;
        Ok(EventPage::read(&ledger, since, limit))
    }

    async fn stats(&self) -> Result<LedgerStats, StorageError> {
        let ledger = self.read()?;
        Ok(LedgerStats {
            admin: ledger.admin().clone(),
            stakeholder_count: ledger.stakeholder_count(),
            part_count: ledger.part_count(),
            last_seq: ledger.last_seq(),
        })
    }
}
