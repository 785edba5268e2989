//! Part Ledger Handlers
//!
//! Registration by manufacturers, status changes by the current owner,
//! open lookups, and authenticity checks by regulators.

use aeroledger_core::{Address, Command, LedgerEvent, Part, PartId, PartStatus};
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

/// Request to register a part
///
/// None of the identifying strings are validated for format.
#[derive(Debug, Deserialize)]
pub struct RegisterPartRequest {
    pub part_number: String,
    pub serial_number: String,
    pub part_name: String,
    /// Opaque certificate reference in the external document store
    pub certificate_ref: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterPartResponse {
    pub id: PartId,
    pub part_number: String,
    pub manufacturer: Address,
    pub seq: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Status name or code 0-4
    pub status: EnumInput,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub id: PartId,
    pub status: PartStatus,
    pub seq: u64,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub id: PartId,
    pub authentic: bool,
}

/// Register a part as the calling manufacturer
///
/// POST /v1/parts
pub async fn register_part(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<RegisterPartRequest>,
) -> Result<(StatusCode, Json<RegisterPartResponse>), ApiError> {
    let entry = state
        .store
        .execute(
            &caller,
            Command::RegisterPart {
                part_number: request.part_number,
                serial_number: request.serial_number,
                part_name: request.part_name,
                certificate_ref: request.certificate_ref,
            },
        )
        .await?;

    match entry.event {
        LedgerEvent::PartRegistered {
            id,
            part_number,
            manufacturer,
            ..
        } => {
            info!(part_id = %id, part_number = %part_number, "Part registered via API");
            Ok((
                StatusCode::CREATED,
                Json(RegisterPartResponse {
                    id,
                    part_number,
                    manufacturer,
                    seq: entry.seq,
                }),
            ))
        }
        other => Err(ApiError::Internal(format!("unexpected event {}", other.kind()))),
    }
}

/// Get a part record
///
/// GET /v1/parts/{id}
pub async fn get_part(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Part>, ApiError> {
    Ok(Json(state.store.get_part(PartId(id)).await?))
}

/// Set a part's status as its current owner
///
/// PUT /v1/parts/{id}/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let status = request.status.to_status()?;

    let entry = state
        .store
        .execute(
            &caller,
            Command::UpdateStatus {
                part_id: PartId(id),
                status,
            },
        )
        .await?;

    Ok(Json(UpdateStatusResponse {
        id: PartId(id),
        status,
        seq: entry.seq,
    }))
}

/// Check that a part's manufacturer is still an active stakeholder
///
/// GET /v1/parts/{id}/verify
pub async fn verify_authenticity(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let authentic = state.store.verify_authenticity(&caller, PartId(id)).await?;

    Ok(Json(VerifyResponse {
        id: PartId(id),
        authentic,
    }))
}
