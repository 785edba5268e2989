//! Stakeholder Registry Handlers
//!
//! Registration and deactivation are restricted to the ledger administrator;
//! lookups are open to any caller.

use aeroledger_core::{Address, Command, LedgerEvent, PartId, Role, Stakeholder};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::{AppState, EnumInput};
use crate::api::caller::Caller;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};

/// Request to register a stakeholder
#[derive(Debug, Deserialize)]
pub struct RegisterStakeholderRequest {
    /// Address of the stakeholder being registered
    pub identity: String,

    /// Display name
    pub name: String,

    /// Role name ("Manufacturer", "Airline", "MRO", "Regulator") or code 0-4
    pub role: EnumInput,
}

#[derive(Debug, Serialize)]
pub struct RegisterStakeholderResponse {
    pub identity: Address,
    pub name: String,
    pub role: Role,
    /// Journal sequence number of the registration
    pub seq: u64,
}

#[derive(Debug, Serialize)]
pub struct DeactivateStakeholderResponse {
    pub identity: Address,
    pub active: bool,
    pub seq: u64,
}

#[derive(Debug, Serialize)]
pub struct StakeholderPartsResponse {
    pub identity: Address,
    pub parts: Vec<PartId>,
    pub count: usize,
}

/// Register a stakeholder
///
/// POST /v1/stakeholders
pub async fn register_stakeholder(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<RegisterStakeholderRequest>,
) -> Result<(StatusCode, Json<RegisterStakeholderResponse>), ApiError> {
    let identity = request.identity;
    if identity.is_empty() {
        return Err(ApiError::BadRequest("Identity cannot be empty".into()));
    }
    let role = request.role.to_role()?;

    let entry = state
        .store
        .execute(
            &caller,
            Command::RegisterStakeholder {
                identity: Address::new(identity),
                name: request.name,
                role,
            },
        )
        .await?;

    match entry.event {
        LedgerEvent::StakeholderRegistered { identity, name, role, .. } => {
            info!(identity = %identity, role = %role, seq = entry.seq, "Stakeholder registered via API");
            Ok((
                StatusCode::CREATED,
                Json(RegisterStakeholderResponse {
                    identity,
                    name,
                    role,
                    seq: entry.seq,
                }),
            ))
        }
        other => Err(ApiError::Internal(format!("unexpected event {}", other.kind()))),
    }
}

/// Look up a stakeholder
///
/// GET /v1/stakeholders/{identity}
pub async fn get_stakeholder(
    State(state): State<Arc<AppState>>,
    ApiPath(identity): ApiPath<String>,
) -> Result<Json<Stakeholder>, ApiError> {
    let identity = Address::new(identity);
    state
        .store
        .get_stakeholder(&identity)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("stakeholder {}", identity)))
}

/// Deactivate a stakeholder
///
/// POST /v1/stakeholders/{identity}/deactivate
pub async fn deactivate_stakeholder(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiPath(identity): ApiPath<String>,
) -> Result<Json<DeactivateStakeholderResponse>, ApiError> {
    let entry = state
        .store
        .execute(
            &caller,
            Command::DeactivateStakeholder {
                identity: Address::new(identity),
            },
        )
        .await?;

    match entry.event {
        LedgerEvent::StakeholderDeactivated { identity, .. } => {
            Ok(Json(DeactivateStakeholderResponse {
                identity,
                active: false,
                seq: entry.seq,
            }))
        }
        other => Err(ApiError::Internal(format!("unexpected event {}", other.kind()))),
    }
}

/// Parts currently held by a stakeholder
///
/// GET /v1/stakeholders/{identity}/parts
pub async fn get_stakeholder_parts(
    State(state): State<Arc<AppState>>,
    ApiPath(identity): ApiPath<String>,
) -> Result<Json<StakeholderPartsResponse>, ApiError> {
    let identity = Address::new(identity);
    let parts = state.store.get_stakeholder_parts(&identity).await?;
    let count = parts.len();

    Ok(Json(StakeholderPartsResponse {
        identity,
        parts,
        count,
    }))
}
