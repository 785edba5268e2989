//! Aviation Part Ledger Server
//!
//! Hosts a single provenance ledger for aviation parts and exposes it over
//! HTTP. Every state-changing request is checked against the caller's role
//! and ownership before it is applied, and every applied change is recorded
//! in an ordered event journal.
//!
//! The caller is identified by the `x-caller-address` header, set by the
//! identity layer in front of this service.
//!
//! ## API Endpoints
//!
//! ### Service
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with ledger counters
//!
//! ### Stakeholders
//! - `POST /v1/stakeholders` - Register a stakeholder (admin)
//! - `GET /v1/stakeholders/{identity}` - Look up a stakeholder
//! - `POST /v1/stakeholders/{identity}/deactivate` - Deactivate a stakeholder (admin)
//! - `GET /v1/stakeholders/{identity}/parts` - Parts currently held by a stakeholder
//!
//! ### Parts
//! - `POST /v1/parts` - Register a part (manufacturer)
//! - `GET /v1/parts/{id}` - Get a part
//! - `PUT /v1/parts/{id}/status` - Set a part's status (owner)
//! - `GET /v1/parts/{id}/verify` - Verify authenticity (regulator)
//! - `POST /v1/parts/{id}/custody` - Transfer custody (owner)
//! - `GET /v1/parts/{id}/custody` - Custody history
//! - `POST /v1/parts/{id}/maintenance` - Record maintenance (MRO)
//! - `GET /v1/parts/{id}/maintenance` - Maintenance history
//!
//! ### Journal
//! - `GET /v1/events?since=N&limit=M` - Journal entries after sequence `N`

pub mod api;
pub mod config;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, ServiceConfig};
#[cfg(feature = "postgres")]
pub use storage::PostgresStore;
pub use storage::{EventPage, LedgerStats, LedgerStore, MemoryStore, StorageError};
