//! Common error types for the course player

use thiserror::Error;

/// Common result type for course player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across course player crates
///
/// The engine itself degrades to `None` on malformed or partial course
/// data; these errors cover the surrounding machinery (configuration,
/// snapshot parsing, invalid caller input).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
