//! Error types for diagram export

use thiserror::Error;

/// Result type for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or writing a diagram
#[derive(Error, Debug)]
pub enum Error {
    /// Graph handed to the exporter breaks an index or length invariant
    #[error("inconsistent graph: {message}")]
    InconsistentGraph {
        /// Description of the violated invariant
        message: String,
    },

    /// HTML template failed to render
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Figure serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact could not be written
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Destination path
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },
}
