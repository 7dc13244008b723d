//! Error types for Lineage Core

use thiserror::Error;

/// Result type alias using Lineage's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lineage error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Node not found: {0}")]
    NodeNotFound(crate::node::NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
