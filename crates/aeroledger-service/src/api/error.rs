//! API error types and responses

use aeroledger_core::LedgerError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::storage::StorageError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Missing caller address")]
    MissingCaller,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Stakeholder holds parts: {0}")]
    HoldsParts(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::MissingCaller => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CALLER",
                format!("Request must carry the {} header", super::caller::CALLER_HEADER),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::FORBIDDEN, "UNAUTHORIZED", msg.clone()),
            ApiError::AlreadyRegistered(identity) => (
                StatusCode::CONFLICT,
                "ALREADY_REGISTERED",
                format!("Stakeholder '{}' is already registered", identity),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} does not exist", what),
            ),
            ApiError::InvalidRecipient(identity) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_RECIPIENT",
                format!("'{}' is not a registered active stakeholder", identity),
            ),
            ApiError::HoldsParts(msg) => (StatusCode::CONFLICT, "HOLDS_PARTS", msg.clone()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unauthorized(reason) => ApiError::Unauthorized(reason),
            LedgerError::AlreadyRegistered(identity) => {
                ApiError::AlreadyRegistered(identity.to_string())
            }
            LedgerError::NotFound(what) => ApiError::NotFound(what),
            LedgerError::InvalidRecipient(identity) => {
                ApiError::InvalidRecipient(identity.to_string())
            }
            LedgerError::HoldsParts { .. } => ApiError::HoldsParts(err.to_string()),
            LedgerError::Journal { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Ledger(e) => e.into(),
            other => {
                error!(error = %other, "Storage failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
