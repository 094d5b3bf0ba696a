//! # Body Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` so that malformed bodies
//! surface through [`AppError`] rather than axum's plain-text rejection.
//! DTOs with rules beyond their shape implement [`Validate`], reporting
//! the same [`ValidationError`]s the core types raise.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use veritas_core::ValidationError;

use crate::error::AppError;

/// Rules a request body must satisfy once it has deserialized.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Unwrap a JSON body. A missing field or a field of the wrong type is a
/// rejection, and both surface as 400 `INVALID_INPUT`.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::InvalidInput(err.body_text()))
}

/// Unwrap a JSON body and check it with [`Validate`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}
