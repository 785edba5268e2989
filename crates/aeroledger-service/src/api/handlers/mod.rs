//! API request handlers

pub mod events;
pub mod history;
pub mod parts;
pub mod stakeholders;

use aeroledger_core::{PartStatus, Role};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::config::ServiceConfig;
use crate::storage::LedgerStore;

pub use events::{list_events, EventsQuery, EventsResponse};
pub use history::{
    get_custody_history, get_maintenance_history, record_maintenance, transfer_custody,
    CustodyHistoryResponse, MaintenanceHistoryResponse, RecordMaintenanceRequest,
    RecordMaintenanceResponse, TransferCustodyRequest, TransferCustodyResponse,
};
pub use parts::{
    get_part, register_part, update_status, verify_authenticity, RegisterPartRequest,
    RegisterPartResponse, UpdateStatusRequest, UpdateStatusResponse, VerifyResponse,
};
pub use stakeholders::{
    deactivate_stakeholder, get_stakeholder, get_stakeholder_parts, register_stakeholder,
    DeactivateStakeholderResponse, RegisterStakeholderRequest, RegisterStakeholderResponse,
    StakeholderPartsResponse,
};

/// Application state shared across handlers
pub struct AppState {
    /// Hosted ledger
    pub store: Arc<dyn LedgerStore>,
    /// Service configuration
    pub config: ServiceConfig,
}

/// A role or status given either by name or by numeric code
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumInput {
    Code(u8),
    Name(String),
}

impl EnumInput {
    pub fn to_role(&self) -> Result<Role, ApiError> {
        let role = match self {
            EnumInput::Code(code) => Role::try_from(*code),
            EnumInput::Name(name) => name.parse(),
        };
        role.map_err(ApiError::BadRequest)
    }

    pub fn to_status(&self) -> Result<PartStatus, ApiError> {
        let status = match self {
            EnumInput::Code(code) => PartStatus::try_from(*code),
            EnumInput::Name(name) => name.parse(),
        };
        status.map_err(ApiError::BadRequest)
    }
}
