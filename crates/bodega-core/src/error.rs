//! Error types for bodega-core

use thiserror::Error;

/// Result type alias using bodega-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bodega-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local store error
    #[error("Local store error: {0}")]
    Local(String),

    /// Remote store error
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
