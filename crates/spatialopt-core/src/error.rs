//! Error types for SpatialOpt

use thiserror::Error;

/// Main error type for SpatialOpt operations.
///
/// Every variant except `Io` and `Json` is raised before a model reaches a
/// solver; building a problem is all-or-nothing.
#[derive(Debug, Error)]
pub enum SpatialOptError {
    /// Missing or malformed coverage fields (mode, type, references)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Coverages disagree on their demand units
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two coverages declare the same facility type
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Parameter or coverage type outside the accepted set
    #[error("Range error: {0}")]
    Range(String),

    /// Serviceable-demand update keyed by unknown or missing demand units
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Reading or writing a coverage or model file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Coverage serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for SpatialOpt operations
pub type Result<T> = std::result::Result<T, SpatialOptError>;
