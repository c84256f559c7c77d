//! Error types for remodel

use thiserror::Error;

/// Core error type for remodel operations
#[derive(Error, Debug)]
pub enum RemodelError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Driver error: {0}")]
    Driver(String),

    /// A dialect feature this adapter intentionally does not implement.
    /// Surfaced to the caller immediately, never retried.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A native column type with no entry in the dialect's type map.
    /// Unknown types are an error, not a fallback to a generic string kind.
    #[error("Unknown column type '{data_type}' for column '{column}'")]
    UnknownColumnType { column: String, data_type: String },

    /// No metadata translator recognizes the connection's dialect.
    #[error("Could not recognize dialect '{0}'")]
    UnrecognizedDialect(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for remodel operations
pub type Result<T> = std::result::Result<T, RemodelError>;
