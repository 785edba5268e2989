//! Caller identity extraction
//!
//! Authentication happens upstream of this service. The host's identity
//! layer forwards the authenticated address in a request header; this module
//! only reads it.

use aeroledger_core::Address;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::error::ApiError;

/// Header carrying the authenticated caller address
pub const CALLER_HEADER: &str = "x-caller-address";

/// The address of the stakeholder making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or(ApiError::MissingCaller)?
            .to_str()
            .map_err(|_| ApiError::BadRequest("Caller address must be visible ASCII".into()))?;

        if value.is_empty() {
            return Err(ApiError::MissingCaller);
        }

        Ok(Caller(Address::new(value)))
    }
}
