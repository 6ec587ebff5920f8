//! Error types for dcp-player
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Seek and resolution paths degrade to `None`/no-op instead
//! of erroring; these variants cover configuration and caller mistakes.

use thiserror::Error;

/// Main error type for the dcp-player crate
#[derive(Error, Debug)]
pub enum Error {
    /// Error bubbled up from the shared engine crate
    #[error(transparent)]
    Common(#[from] dcp_common::Error),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using dcp-player Error
pub type Result<T> = std::result::Result<T, Error>;
