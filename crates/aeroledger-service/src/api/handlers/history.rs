//! Custody and Maintenance History Handlers
//!
//! Both logs are append-only. Transfers are made by the current owner;
//! maintenance is recorded by any active MRO.

use aeroledger_core::{
    Address, Command, CustodyRecord, LedgerEvent, MaintenanceRecord, PartId, PartStatus,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AppState;
use crate::api::caller::Caller;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};

#[derive(Debug, Deserialize)]
pub struct TransferCustodyRequest {
    /// Recipient address; must be a registered, active stakeholder
    pub to: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct TransferCustodyResponse {
    pub id: PartId,
    pub from: Address,
    pub to: Address,
    pub status: PartStatus,
    pub seq: u64,
}

#[derive(Debug, Deserialize)]
pub struct RecordMaintenanceRequest {
    pub maintenance_type: String,
    /// Opaque report reference in the external document store
    pub report_ref: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct RecordMaintenanceResponse {
    pub id: PartId,
    /// 1-based position within the part's maintenance log
    pub record_index: u64,
    pub performer: Address,
    pub seq: u64,
}

#[derive(Debug, Serialize)]
pub struct CustodyHistoryResponse {
    pub id: PartId,
    pub records: Vec<CustodyRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MaintenanceHistoryResponse {
    pub id: PartId,
    pub records: Vec<MaintenanceRecord>,
    pub count: usize,
}

/// Transfer custody of a part
///
/// POST /v1/parts/{id}/custody
pub async fn transfer_custody(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<TransferCustodyRequest>,
) -> Result<(StatusCode, Json<TransferCustodyResponse>), ApiError> {
    let entry = state
        .store
        .execute(
            &caller,
            Command::TransferCustody {
                part_id: PartId(id),
                to: Address::new(request.to),
                reason: request.reason,
            },
        )
        .await?;

    match entry.event {
        LedgerEvent::CustodyTransferred { id, from, to, .. } => Ok((
            StatusCode::CREATED,
            Json(TransferCustodyResponse {
                id,
                from,
                to,
                status: PartStatus::InTransit,
                seq: entry.seq,
            }),
        )),
        other => Err(ApiError::Internal(format!("unexpected event {}", other.kind()))),
    }
}

/// Custody log of a part, oldest first
///
/// GET /v1/parts/{id}/custody
pub async fn get_custody_history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<CustodyHistoryResponse>, ApiError> {
    let records = state.store.get_custody_history(PartId(id)).await?;
    let count = records.len();

    Ok(Json(CustodyHistoryResponse {
        id: PartId(id),
        records,
        count,
    }))
}

/// Record maintenance on a part
///
/// POST /v1/parts/{id}/maintenance
pub async fn record_maintenance(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<RecordMaintenanceRequest>,
) -> Result<(StatusCode, Json<RecordMaintenanceResponse>), ApiError> {
    let entry = state
        .store
        .execute(
            &caller,
            Command::RecordMaintenance {
                part_id: PartId(id),
                maintenance_type: request.maintenance_type,
                report_ref: request.report_ref,
                notes: request.notes,
            },
        )
        .await?;

    match entry.event {
        LedgerEvent::MaintenanceRecorded {
            id,
            record_index,
            performer,
            ..
        } => Ok((
            StatusCode::CREATED,
            Json(RecordMaintenanceResponse {
                id,
                record_index,
                performer,
                seq: entry.seq,
            }),
        )),
        other => Err(ApiError::Internal(format!("unexpected event {}", other.kind()))),
    }
}

/// Maintenance log of a part, oldest first
///
/// GET /v1/parts/{id}/maintenance
pub async fn get_maintenance_history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<MaintenanceHistoryResponse>, ApiError> {
    let records = state.store.get_maintenance_history(PartId(id)).await?;
    let count = records.len();

    Ok(Json(MaintenanceHistoryResponse {
        id: PartId(id),
        records,
        count,
    }))
}
