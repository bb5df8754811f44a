use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the SafeRoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Failing to find a route is not an error: searches report that through
/// [`crate::RoutePlanOutcome`]. Only malformed input ends up here.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a node identifier is not present in the graph store.
    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },

    /// Raised when an edge carries attributes the store cannot route over.
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        reason: String,
    },

    /// Raised when a graph document could not be read from disk.
    #[error("failed to read graph document at {path}: {source}")]
    GraphDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when engine configuration taken from the environment is malformed.
    #[error("invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
