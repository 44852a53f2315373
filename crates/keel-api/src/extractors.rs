//! # Request Value Binding
//!
//! Helpers for binding raw request values (path segments, query parameters,
//! header values) to typed values. A failed bind produces
//! [`AppError::InvalidValue`] carrying the property name and the submitted
//! value, so every handler reports binding failures in the same shape.

use std::str::FromStr;

use crate::error::AppError;

/// Parse a raw request value into `T`, naming the bound property on failure.
///
/// # Errors
///
/// Returns [`AppError::InvalidValue`] (HTTP 400) when the value does not
/// parse; the error message contains both the property name and the
/// submitted value.
pub fn bind<T: FromStr>(property: &str, raw: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError::invalid_value(property, raw))
}

/// Parse an optional raw value, treating `None` as `Ok(None)`.
///
/// # Errors
///
/// Same as [`bind`] when the value is present but malformed.
pub fn bind_opt<T: FromStr>(property: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    raw.map(|r| bind(property, r)).transpose()
}
