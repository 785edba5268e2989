//! API module for the ledger server

pub mod caller;
pub mod error;
pub mod extract;
pub mod handlers;

use aeroledger_core::Address;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use error::ApiError;
use handlers::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub admin: Address,
    pub name: Option<String>,
    pub stakeholder_count: usize,
    pub part_count: u64,
    pub last_seq: u64,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<ReadyResponse>, ApiError> {
    let stats = state.store.stats().await?;

    Ok(Json(ReadyResponse {
        ready: true,
        admin: stats.admin,
        name: state.config.name.clone(),
        stakeholder_count: stats.stakeholder_count,
        part_count: stats.part_count,
        last_seq: stats.last_seq,
    }))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration for browser-based dashboards
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Stakeholder registry
        .route("/v1/stakeholders", post(handlers::register_stakeholder))
        .route("/v1/stakeholders/{identity}", get(handlers::get_stakeholder))
        .route(
            "/v1/stakeholders/{identity}/deactivate",
            post(handlers::deactivate_stakeholder),
        )
        .route(
            "/v1/stakeholders/{identity}/parts",
            get(handlers::get_stakeholder_parts),
        )
        // Parts
        .route("/v1/parts", post(handlers::register_part))
        .route("/v1/parts/{id}", get(handlers::get_part))
        .route("/v1/parts/{id}/status", put(handlers::update_status))
        .route("/v1/parts/{id}/verify", get(handlers::verify_authenticity))
        // History
        .route(
            "/v1/parts/{id}/custody",
            post(handlers::transfer_custody).get(handlers::get_custody_history),
        )
        .route(
            "/v1/parts/{id}/maintenance",
            post(handlers::record_maintenance).get(handlers::get_maintenance_history),
        )
        // Journal
        .route("/v1/events", get(handlers::list_events))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
