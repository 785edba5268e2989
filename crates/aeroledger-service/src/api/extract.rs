//! Request extractors with JSON rejections
//!
//! axum's stock `Json`, `Path` and `Query` reject with plain-text bodies and,
//! for a body that parses but misses fields, a 422 status. These wrappers
//! route every rejection through [`ApiError::BadRequest`] so clients always
//! get a 400 with the `{error, code}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
