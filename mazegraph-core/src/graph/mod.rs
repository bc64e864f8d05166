//! Weighted Graph
//!
//! This module implements the undirected weighted graph that maze builders
//! and AI navigation share.
//!
//! # Overview
//!
//! - Nodes hold a payload (cell metadata, world position) and the set of
//!   edges incident to them.
//! - Edges hold a weight and their two endpoint nodes.
//! - The graph owns both, hands out `Copy` handles, and is the only place
//!   where node/edge cross-references are mutated.
//!
//! # Design Decisions
//!
//! 1. Nodes and edges live in two arenas owned by the graph and point at each
//!    other through handles, never through references. Removal touches both
//!    directions with plain index updates and there is no ownership cycle.
//!
//! 2. Arenas are append-only per lifetime. A maze builder that scans nodes by
//!    position (spawn points, cell classification) sees a stable order, and
//!    `node_at(i)` names the same node until that node is removed.
//!
//! 3. Node and edge instances are drawn from and returned to a shared
//!    [`Recycler`](crate::recycler::Recycler).

mod edge;
mod id;
mod node;
mod weighted;

pub use edge::Edge;
pub use id::{EdgeId, GraphId, NodeId};
pub use node::Node;
pub use weighted::WeightedGraph;
