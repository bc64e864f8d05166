//! Mazegraph Core
//!
//! This crate provides the graph container behind procedural mazes and AI
//! navigation. It implements:
//!
//! - A weighted, undirected graph over arbitrary node payloads and weights
//! - Handle-based node/edge references with lifetime checks
//! - A shared object recycler that reuses node and edge instances across
//!   graph rebuilds
//!
//! # Architecture
//!
//! - `recycler`: type-keyed pool of reusable instances
//! - `graph`: nodes, edges, handles and the `WeightedGraph` container
//! - `config`: tunables for both
//! - `error`: the failure taxonomy
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mazegraph_core::{Recycler, WeightedGraph};
//!
//! // One recycler for the whole simulation.
//! let recycler = Arc::new(Recycler::new());
//!
//! let mut maze: WeightedGraph<(i32, i32), f32> = WeightedGraph::new(recycler.clone());
//! let start = maze.add_isolated_node((0, 0)).unwrap();
//! let next = maze.add_node((0, 1), [(start, 1.0)]).unwrap();
//! assert!(maze.edge_between(start, next).is_some());
//!
//! // Tear down and rebuild: instances come back from the recycler.
//! maze.init();
//! maze.add_isolated_node((5, 5)).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod recycler;

pub use config::{GraphConfig, RecyclerConfig};
pub use error::{ErrorKind, GraphError, GraphResult};
pub use graph::{Edge, EdgeId, GraphId, Node, NodeId, WeightedGraph};
pub use recycler::{PoolStats, Recyclable, Recycler};
