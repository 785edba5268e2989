//! Ledger events
//!
//! Every successful mutation yields exactly one `LedgerEvent`. Events carry
//! the full state change so that a journal of them can rebuild a ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::types::{Address, PartId, PartStatus, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    StakeholderRegistered {
        identity: Address,
        name: String,
        role: Role,
        at: DateTime<Utc>,
    },
    StakeholderDeactivated {
        identity: Address,
        at: DateTime<Utc>,
    },
    PartRegistered {
        id: PartId,
        part_number: String,
        serial_number: String,
        part_name: String,
        certificate_ref: String,
        manufacturer: Address,
        at: DateTime<Utc>,
    },
    PartStatusUpdated {
        id: PartId,
        status: PartStatus,
        by: Address,
        at: DateTime<Utc>,
    },
    CustodyTransferred {
        id: PartId,
        from: Address,
        to: Address,
        reason: String,
        at: DateTime<Utc>,
    },
    MaintenanceRecorded {
        id: PartId,
        /// 1-based position of the record within the part's maintenance log
        record_index: u64,
        performer: Address,
        maintenance_type: String,
        report_ref: String,
        notes: String,
        at: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Short name of the event variant
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::StakeholderRegistered { .. } => "StakeholderRegistered",
            LedgerEvent::StakeholderDeactivated { .. } => "StakeholderDeactivated",
            LedgerEvent::PartRegistered { .. } => "PartRegistered",
            LedgerEvent::PartStatusUpdated { .. } => "PartStatusUpdated",
            LedgerEvent::CustodyTransferred { .. } => "CustodyTransferred",
            LedgerEvent::MaintenanceRecorded { .. } => "MaintenanceRecorded",
        }
    }

    /// Part this event concerns, if any
    pub fn part_id(&self) -> Option<PartId> {
        match self {
            LedgerEvent::PartRegistered { id, .. }
            | LedgerEvent::PartStatusUpdated { id, .. }
            | LedgerEvent::CustodyTransferred { id, .. }
            | LedgerEvent::MaintenanceRecorded { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::StakeholderRegistered { at, .. }
            | LedgerEvent::StakeholderDeactivated { at, .. }
            | LedgerEvent::PartRegistered { at, .. }
            | LedgerEvent::PartStatusUpdated { at, .. }
            | LedgerEvent::CustodyTransferred { at, .. }
            | LedgerEvent::MaintenanceRecorded { at, .. } => *at,
        }
    }

    /// Reconstruct the caller and command that produced this event
    ///
    /// Administrative events are attributed to `admin`.
    pub fn to_command(&self, admin: &Address) -> (Address, Command) {
        match self.clone() {
            LedgerEvent::StakeholderRegistered { identity, name, role, .. } => (
                admin.clone(),
                Command::RegisterStakeholder { identity, name, role },
            ),
            LedgerEvent::StakeholderDeactivated { identity, .. } => {
                (admin.clone(), Command::DeactivateStakeholder { identity })
            }
            LedgerEvent::PartRegistered {
                part_number,
                serial_number,
                part_name,
                certificate_ref,
                manufacturer,
                ..
            } => (
                manufacturer,
                Command::RegisterPart {
                    part_number,
                    serial_number,
                    part_name,
                    certificate_ref,
                },
            ),
            LedgerEvent::PartStatusUpdated { id, status, by, .. } => {
                (by, Command::UpdateStatus { part_id: id, status })
            }
            LedgerEvent::CustodyTransferred { id, from, to, reason, .. } => (
                from,
                Command::TransferCustody { part_id: id, to, reason },
            ),
            LedgerEvent::MaintenanceRecorded {
                id,
                performer,
                maintenance_type,
                report_ref,
                notes,
                ..
            } => (
                performer,
                Command::RecordMaintenance {
                    part_id: id,
                    maintenance_type,
                    report_ref,
                    notes,
                },
            ),
        }
    }
}

/// An event as stored in the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 1
    pub seq: u64,
    pub event: LedgerEvent,
}
