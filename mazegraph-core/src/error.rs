//! Graph Errors
//!
//! Failures fall into two families. Ordinary failures (a dangling handle, a
//! removal of something the graph does not own, a mutation on a destroyed
//! graph) are returned to the caller and leave the graph untouched.
//! Consistency violations mean a node/edge cross-reference is broken; they
//! point at a bug in mutation ordering, not at bad input.

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Result alias used throughout the crate.
pub type GraphResult<T> = Result<T, GraphError>;

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A handle passed as an argument does not resolve to a live entity.
    InvalidArgument,

    /// The entity to remove is not owned by this graph.
    NotFound,

    /// The graph is not in a state that allows mutation.
    InvalidState,

    /// A node/edge cross-reference is broken.
    Consistency,
}

/// Errors produced by [`WeightedGraph`](crate::graph::WeightedGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} is not a live node of this graph")]
    InvalidNode(NodeId),

    #[error("node {0} is not owned by this graph")]
    NodeNotFound(NodeId),

    #[error("edge {0} is not owned by this graph")]
    EdgeNotFound(EdgeId),

    #[error("graph has been destroyed; call init() before mutating it")]
    Destroyed,

    #[error("graph slot space exhausted; call init() to start a new lifetime")]
    Full,

    #[error("internal consistency violation: {0}")]
    Inconsistent(String),
}

impl GraphError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::InvalidNode(_) => ErrorKind::InvalidArgument,
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_) => ErrorKind::NotFound,
            GraphError::Destroyed | GraphError::Full => ErrorKind::InvalidState,
            GraphError::Inconsistent(_) => ErrorKind::Consistency,
        }
    }

    /// True when the error signals a defect in the graph itself rather than
    /// invalid caller input.
    pub fn is_defect(&self) -> bool {
        self.kind() == ErrorKind::Consistency
    }
}
