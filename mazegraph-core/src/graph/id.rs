//! Handles
//!
//! Nodes and edges are addressed by small `Copy` handles rather than
//! references. A handle names the graph that issued it, the lifetime of that
//! graph (bumped by every `init`/`destroy`), and the arena slot. It resolves
//! only while all three still match, so a handle kept past a removal, a
//! reset, or carried over to another graph is detected instead of aliasing
//! whatever occupies the slot now. A graph whose epoch counter runs out takes
//! a fresh `GraphId` instead of wrapping.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier of a graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(u64);

impl GraphId {
    /// Generate a new unique graph ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a node of a [`WeightedGraph`](super::WeightedGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    graph: GraphId,
    epoch: u32,
    index: u32,
}

impl NodeId {
    pub(crate) fn new(graph: GraphId, epoch: u32, index: u32) -> Self {
        Self { graph, epoch, index }
    }

    /// The graph that issued this handle.
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// The graph lifetime this handle belongs to.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Insertion position of the node within its graph lifetime.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}:{}:{})", self.graph.0, self.epoch, self.index)
    }
}

/// Handle to an edge of a [`WeightedGraph`](super::WeightedGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    graph: GraphId,
    epoch: u32,
    index: u32,
}

impl EdgeId {
    pub(crate) fn new(graph: GraphId, epoch: u32, index: u32) -> Self {
        Self { graph, epoch, index }
    }

    /// The graph that issued this handle.
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// The graph lifetime this handle belongs to.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Insertion position of the edge within its graph lifetime.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({}:{}:{})", self.graph.0, self.epoch, self.index)
    }
}
