//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so configuration problems surface unchanged at
//! every layer.

use thiserror::Error;

/// Errors raised by `nd-core` validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {field} = {value}: {reason}")]
    Config {
        field:  &'static str,
        value:  String,
        reason: &'static str,
    },
}

impl CoreError {
    pub(crate) fn config(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        CoreError::Config { field, value: value.to_string(), reason }
    }
}

/// Shorthand result type for `nd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
