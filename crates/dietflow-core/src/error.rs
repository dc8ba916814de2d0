//! Error types for dietflow-core

use thiserror::Error;

/// Result type alias for dietflow-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dietflow-core
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset could not be opened, decoded or lacks a required column
    #[error("data source '{path}': {message}")]
    DataSource {
        /// Path of the dataset
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A filtering stage removed every record
    #[error("no records left after {stage}")]
    EmptyResult {
        /// Stage that emptied the record set
        stage: String,
    },

    /// A numeric column could not be normalized
    #[error("cannot normalize column '{column}': {message}")]
    Normalization {
        /// Normalized column name
        column: String,
        /// Description of the failure
        message: String,
    },

    /// Label or index invariant of the flow graph was violated
    #[error("flow graph inconsistency: {message}")]
    GraphConsistency {
        /// Description of the violated invariant
        message: String,
    },

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn data_source(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn graph(message: impl Into<String>) -> Self {
        Self::GraphConsistency {
            message: message.into(),
        }
    }
}
