//! Event Journal Handler
//!
//! Observers poll the journal with the last sequence number they have seen.

use aeroledger_core::JournalEntry;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::extract::ApiQuery;

pub const DEFAULT_PAGE: usize = 100;
pub const MAX_PAGE: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// Return entries after this sequence number
    #[serde(default)]
    pub since: u64,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<JournalEntry>,
    /// Newest sequence number in the journal
    pub last_seq: u64,
}

/// GET /v1/events?since=N&limit=M
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> Result<Json<EventsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
    let page = state.store.events_since(query.since, limit).await?;

    Ok(Json(EventsResponse {
        events: page.events,
        last_seq: page.last_seq,
    }))
}
