//! Network-subsystem error type.

use thiserror::Error;

use nd_core::LinkId;

/// Errors produced by `nd-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("link rows out of order: expected {expected}, found {found}")]
    LinkOutOfOrder { expected: LinkId, found: LinkId },

    #[error("link {link}: invalid free-flow speed {value} m/s")]
    InvalidSpeed { link: LinkId, value: f64 },

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
