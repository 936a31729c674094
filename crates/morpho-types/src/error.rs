//! Error types for the Morpho core.
//!
//! All crates return `MorphoResult<T>` from fallible operations. Only
//! construction is fallible; a built body never fails to step.

use thiserror::Error;

/// Unified error type for the Morpho core.
#[derive(Debug, Error)]
pub enum MorphoError {
    /// Mesh arrays are malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Traversal could not resolve a consistent tetrahedral fan.
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),

    /// A link or cell has (near-)zero rest length or volume.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The operation is declared but not supported.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Convenience alias for `Result<T, MorphoError>`.
pub type MorphoResult<T> = Result<T, MorphoError>;
