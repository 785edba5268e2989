//! Mutating requests accepted by the ledger

use serde::{Deserialize, Serialize};

use crate::types::{Address, PartId, PartStatus, Role};

/// A single mutating request
///
/// Commands are validated against the current ledger state together with the
/// caller's address; a valid command becomes a `LedgerEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    RegisterStakeholder {
        identity: Address,
        name: String,
        role: Role,
    },
    DeactivateStakeholder {
        identity: Address,
    },
    RegisterPart {
        part_number: String,
        serial_number: String,
        part_name: String,
        certificate_ref: String,
    },
    UpdateStatus {
        part_id: PartId,
        status: PartStatus,
    },
    TransferCustody {
        part_id: PartId,
        to: Address,
        reason: String,
    },
    RecordMaintenance {
        part_id: PartId,
        maintenance_type: String,
        report_ref: String,
        notes: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::RegisterStakeholder { .. } => "register_stakeholder",
            Command::DeactivateStakeholder { .. } => "deactivate_stakeholder",
            Command::RegisterPart { .. } => "register_part",
            Command::UpdateStatus { .. } => "update_status",
            Command::TransferCustody { .. } => "transfer_custody",
            Command::RecordMaintenance { .. } => "record_maintenance",
        }
    }
}
