//! Error types for the scoped authorization engine
//!
//! Denials are not errors: they are returned inside `Ok(Decision)`. The
//! variants here are faults (bad configuration, store failures) that the
//! caller surfaces as such.

use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Assignment store failure (connectivity, timeout, query)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
