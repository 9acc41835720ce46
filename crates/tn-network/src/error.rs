//! Network-subsystem error type.

use thiserror::Error;

use tn_core::NodeId;

/// Errors produced by `tn-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no link between adjacent route nodes {from} and {to}")]
    MissingLink { from: NodeId, to: NodeId },

    #[error("duplicate stop label {0:?}")]
    DuplicateLabel(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `tn-network`.
pub type NetworkResult<T> = Result<T, NetworkError>;
