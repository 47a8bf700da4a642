//! Error types for graph construction and relaxation.

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Errors raised by graph operations.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// The handle does not belong to this graph, or is out of range.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// The handle does not belong to this graph, or is out of range.
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),

    /// No node is registered under this name.
    #[error("no node named {0:?}")]
    NodeNotFound(String),

    /// No edge is registered under this name.
    #[error("no edge named {0:?}")]
    EdgeNotFound(String),

    /// A node with this name is already registered.
    #[error("duplicate node name: {0:?}")]
    DuplicateNode(String),

    /// An edge with this name is already registered.
    #[error("duplicate edge name: {0:?}")]
    DuplicateEdge(String),

    /// Fixed costs must be finite and non-negative.
    #[error("invalid fixed cost for edge {edge:?}: {cost}")]
    InvalidCost { edge: String, cost: f64 },

    /// A random root was requested but no node is registered.
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(feature = "python")]
impl From<GraphError> for pyo3::PyErr {
    fn from(err: GraphError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
