//! Weighted Graph
//!
//! The container that owns every node and edge, hands out handles to them,
//! and keeps the node→edge and edge→node references in agreement.
//!
//! # Storage
//!
//! Nodes and edges live in two slot arenas. Slots are append-only for the
//! lifetime of the graph: removing an entity leaves an empty slot behind and
//! nothing is compacted, so iteration always follows insertion order and a
//! node's position stays stable while the graph is alive. `init()` and
//! `destroy()` start a new lifetime, which invalidates every old handle.
//!
//! Node and edge instances themselves come from a shared [`Recycler`] and go
//! back to it on removal, so rebuilding a maze reuses the previous maze's
//! incident-edge buffers.
//!
//! # Invariants
//!
//! After every public call:
//!
//! - every live edge has both endpoints set,
//! - both endpoints are live nodes of this graph,
//! - an edge is listed in a node's incident set exactly when the node is one
//!   of its endpoints.
//!
//! Mutations validate all inputs before touching anything, so a returned
//! error always means "nothing changed".

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, error, warn};

use super::edge::Edge;
use super::id::{EdgeId, GraphId, NodeId};
use super::node::Node;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::recycler::Recycler;

/// Size hint passed to the recycler for edges. Edges own no collections.
const EDGE_SIZE_HINT: usize = 0;

/// Highest number of slots a single graph lifetime can hand out.
const SLOT_LIMIT: usize = u32::MAX as usize;

/// An undirected weighted graph with pooled nodes and edges.
///
/// # Type Parameters
///
/// - `D`: node payload, e.g. maze-cell metadata.
/// - `W`: edge weight. Must be comparable so clients can order edges.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use mazegraph_core::{Recycler, WeightedGraph};
///
/// let mut graph: WeightedGraph<&str, f32> = WeightedGraph::new(Arc::new(Recycler::new()));
/// let a = graph.add_isolated_node("a").unwrap();
/// let b = graph.add_node("b", [(a, 1.5)]).unwrap();
///
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.neighbors(b).next().map(|(n, _)| n), Some(a));
/// ```
pub struct WeightedGraph<D, W>
where
    D: Send + 'static,
    W: PartialOrd + Send + 'static,
{
    id: GraphId,
    epoch: u32,
    destroyed: bool,
    config: GraphConfig,
    recycler: Arc<Recycler>,
    nodes: Vec<Option<Node<D>>>,
    edges: Vec<Option<Edge<W>>>,
    node_count: usize,
    edge_count: usize,
}

impl<D, W> WeightedGraph<D, W>
where
    D: Send + 'static,
    W: PartialOrd + Send + 'static,
{
    /// Create an empty graph drawing instances from `recycler`.
    pub fn new(recycler: Arc<Recycler>) -> Self {
        Self::with_config(recycler, GraphConfig::default())
    }

    /// Create an empty graph with explicit settings.
    pub fn with_config(recycler: Arc<Recycler>, config: GraphConfig) -> Self {
        let id = GraphId::new();
        debug!(graph = id.raw(), "graph created");
        Self {
            id,
            epoch: 0,
            destroyed: false,
            config,
            recycler,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_count: 0,
            edge_count: 0,
        }
    }

    /// Reset to an empty graph.
    ///
    /// All nodes and edges go back to the recycler and every handle issued
    /// so far stops resolving. Calling it twice is the same as calling it
    /// once. Also revives a destroyed graph.
    pub fn init(&mut self) {
        self.release_all();
        self.next_lifetime();
        self.destroyed = false;
        debug!(graph = self.id.raw(), epoch = self.epoch, "graph initialized");
    }

    /// Destroy every edge, then every node, and refuse further mutation
    /// until [`init`](Self::init) is called.
    pub fn destroy(&mut self) {
        let (nodes, edges) = (self.node_count, self.edge_count);
        self.release_all();
        self.next_lifetime();
        self.destroyed = true;
        debug!(graph = self.id.raw(), nodes, edges, "graph destroyed");
    }

    /// Add a node holding `data`, connected to each `(neighbor, weight)`.
    ///
    /// Fails with [`GraphError::InvalidNode`] if any neighbor is not a live
    /// node of this graph. Neighbors are checked before anything is created,
    /// so on failure neither the node nor any of its edges exist.
    pub fn add_node<I>(&mut self, data: D, neighbors: I) -> GraphResult<NodeId>
    where
        I: IntoIterator<Item = (NodeId, W)>,
    {
        self.ensure_active()?;

        let neighbors: SmallVec<[(NodeId, W); 4]> = neighbors.into_iter().collect();
        if let Some(&(missing, _)) = neighbors.iter().find(|(n, _)| !self.contains_node(*n)) {
            warn!(
                graph = self.id.raw(),
                neighbor = %missing,
                "cannot add node: requested neighbor does not exist"
            );
            return Err(GraphError::InvalidNode(missing));
        }
        self.reserve(1, neighbors.len())?;

        let id = self.push_node(data);
        let degree = neighbors.len();
        for (neighbor, weight) in neighbors {
            self.link(id, neighbor, weight);
        }

        debug!(graph = self.id.raw(), node = %id, degree, "node added");
        Ok(id)
    }

    /// Add a node with no edges.
    pub fn add_isolated_node(&mut self, data: D) -> GraphResult<NodeId> {
        self.add_node(data, std::iter::empty())
    }

    /// Remove a node together with every edge incident to it.
    ///
    /// Each incident edge is detached from its other endpoint and destroyed
    /// before the node itself is destroyed. Returns the node's payload.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<D> {
        self.ensure_active()?;

        let Some(node) = self.node_slot(id) else {
            warn!(graph = self.id.raw(), node = %id, "cannot remove node: not owned by this graph");
            return Err(GraphError::NodeNotFound(id));
        };
        let incident: SmallVec<[EdgeId; 8]> = node.edges().iter().copied().collect();

        for &edge_id in &incident {
            let Some(edge) = self.edge_slot(edge_id) else {
                return Err(self.violation(format!("{id} lists {edge_id}, which is not live")));
            };
            let Some(other) = edge.opposite(id) else {
                return Err(self.violation(format!("{id} lists {edge_id}, which does not reference it")));
            };
            if !self.node_slot(other).is_some_and(|n| n.has_edge(edge_id)) {
                return Err(self.violation(format!("{other} does not list its incident {edge_id}")));
            }
        }

        for edge_id in incident {
            self.detach_edge(edge_id);
            self.release_edge(edge_id);
        }

        let Some(mut node) = self.nodes[id.index()].take() else {
            return Err(self.violation(format!("{id} vanished during removal")));
        };
        self.node_count -= 1;
        let data = node.take_data();
        self.recycler.recycle(node);

        debug!(graph = self.id.raw(), node = %id, "node removed");
        data.ok_or_else(|| self.violation(format!("{id} was live without a payload")))
    }

    /// Connect two live nodes with an edge of the given weight.
    ///
    /// Self-loops are allowed; clients that forbid them must check.
    pub fn add_edge(&mut self, first: NodeId, second: NodeId, weight: W) -> GraphResult<EdgeId> {
        self.ensure_active()?;

        for endpoint in [first, second] {
            if !self.contains_node(endpoint) {
                warn!(graph = self.id.raw(), node = %endpoint, "cannot add edge: endpoint does not exist");
                return Err(GraphError::InvalidNode(endpoint));
            }
        }
        self.reserve(0, 1)?;

        let id = self.link(first, second, weight);
        debug!(graph = self.id.raw(), edge = %id, %first, %second, "edge added");
        Ok(id)
    }

    /// Detach an edge from both endpoints and destroy it. Returns its weight.
    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<W> {
        self.ensure_active()?;

        let Some(edge) = self.edge_slot(id) else {
            warn!(graph = self.id.raw(), edge = %id, "cannot remove edge: not owned by this graph");
            return Err(GraphError::EdgeNotFound(id));
        };
        let has_weight = edge.weight().is_some();
        let Some((first, second)) = edge.endpoints() else {
            return Err(self.violation(format!("{id} is live with a missing endpoint")));
        };
        if !has_weight {
            return Err(self.violation(format!("{id} is live without a weight")));
        }
        for endpoint in [first, second] {
            if !self.node_slot(endpoint).is_some_and(|n| n.has_edge(id)) {
                return Err(self.violation(format!("endpoint {endpoint} does not list {id}")));
            }
        }

        self.detach_edge(id);
        let weight = self.release_edge(id);

        debug!(graph = self.id.raw(), edge = %id, "edge removed");
        weight.ok_or_else(|| self.violation(format!("{id} lost its weight during removal")))
    }

    /// Replace the weight of a live edge, returning the previous one.
    pub fn set_weight(&mut self, id: EdgeId, weight: W) -> GraphResult<W> {
        self.ensure_active()?;

        match self.edge_slot(id) {
            None => {
                warn!(graph = self.id.raw(), edge = %id, "cannot reweigh edge: not owned by this graph");
                return Err(GraphError::EdgeNotFound(id));
            }
            Some(edge) if edge.weight().is_none() || edge.endpoints().is_none() => {
                return Err(self.violation(format!("{id} is live but blank")));
            }
            Some(_) => {}
        }

        let previous = self.edge_slot_mut(id).and_then(|edge| edge.set_weight(weight));
        previous.ok_or_else(|| self.violation(format!("{id} lost its weight")))
    }

    /// Identity of this graph; handles carry it.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Current lifetime; bumped by `init` and `destroy`.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Settings this graph was created with.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The recycler nodes and edges are drawn from.
    pub fn recycler(&self) -> &Arc<Recycler> {
        &self.recycler
    }

    /// True between `destroy()` and the next `init()`.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True when the graph has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Whether `id` resolves to a live node of this graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_slot(id).is_some()
    }

    /// Whether `id` resolves to a live edge of this graph.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge_slot(id).is_some()
    }

    /// Borrow a live node.
    pub fn node(&self, id: NodeId) -> Option<&Node<D>> {
        self.node_slot(id)
    }

    /// Borrow a live edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<W>> {
        self.edge_slot(id)
    }

    /// Payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&D> {
        self.node_slot(id)?.data()
    }

    /// Mutable payload of a live node.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut D> {
        self.node_slot_mut(id)?.data_mut()
    }

    /// Weight of a live edge.
    pub fn weight(&self, id: EdgeId) -> Option<&W> {
        self.edge_slot(id)?.weight()
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<D>)> + '_ {
        let (graph, epoch) = (self.id, self.epoch);
        self.nodes.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref()
                .map(|node| (NodeId::new(graph, epoch, index as u32), node))
        })
    }

    /// Handles of live nodes in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|(id, _)| id)
    }

    /// The node inserted at `position` in the current lifetime, if it is
    /// still live. Removals leave their position empty.
    pub fn node_at(&self, position: usize) -> Option<NodeId> {
        self.nodes
            .get(position)?
            .as_ref()
            .map(|_| NodeId::new(self.id, self.epoch, position as u32))
    }

    /// The edge inserted at `position` in the current lifetime, if it is
    /// still live.
    pub fn edge_at(&self, position: usize) -> Option<EdgeId> {
        self.edges
            .get(position)?
            .as_ref()
            .map(|_| EdgeId::new(self.id, self.epoch, position as u32))
    }

    /// Number of positions handed out in the current lifetime, live or not.
    pub fn node_positions(&self) -> usize {
        self.nodes.len()
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<W>)> + '_ {
        let (graph, epoch) = (self.id, self.epoch);
        self.edges.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref()
                .map(|edge| (EdgeId::new(graph, epoch, index as u32), edge))
        })
    }

    /// Handles of live edges in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().map(|(id, _)| id)
    }

    /// `(neighbor, edge)` for every edge incident to `id`. Empty if `id` is
    /// not live. A self-loop yields `id` as its own neighbor.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.node_slot(id).into_iter().flat_map(move |node| {
            node.edges().iter().filter_map(move |&edge_id| {
                let other = self.edge_slot(edge_id)?.opposite(id)?;
                Some((other, edge_id))
            })
        })
    }

    /// Number of edges incident to a live node.
    pub fn degree(&self, id: NodeId) -> Option<usize> {
        self.node_slot(id).map(Node::degree)
    }

    /// First edge (in `a`'s incident order) connecting `a` and `b`.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.node_slot(a)?
            .edges()
            .iter()
            .copied()
            .find(|&edge_id| self.edge_slot(edge_id).is_some_and(|e| e.connects(a, b)))
    }

    /// Live edges sorted by ascending weight.
    ///
    /// Equal weights keep insertion order. Weights that do not compare equal
    /// to themselves (such as `NaN`) are placed last, in insertion order.
    ///
    /// Incomparable pairs are treated as equal. For a weight type whose
    /// order is only partial among distinct values (sets, divisibility) the
    /// result is unspecified and the sort may panic; use
    /// [`edges_by_key`](Self::edges_by_key) with a total key instead.
    pub fn edges_by_weight(&self) -> Vec<EdgeId> {
        let (mut ordered, unordered): (Vec<_>, Vec<_>) = self
            .edges()
            .filter_map(|(id, edge)| edge.weight().map(|w| (id, w)))
            .partition(|(_, w)| w.partial_cmp(w) == Some(Ordering::Equal));

        ordered.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        ordered
            .into_iter()
            .chain(unordered)
            .map(|(id, _)| id)
            .collect()
    }

    /// Live edges sorted by a caller-supplied total key of their weight.
    ///
    /// Stable: edges with equal keys keep insertion order.
    pub fn edges_by_key<K, F>(&self, mut key: F) -> Vec<EdgeId>
    where
        K: Ord,
        F: FnMut(&W) -> K,
    {
        let mut keyed: Vec<(EdgeId, K)> = self
            .edges()
            .filter_map(|(id, edge)| edge.weight().map(|w| (id, key(w))))
            .collect();
        keyed.sort_by(|(_, a), (_, b)| a.cmp(b));
        keyed.into_iter().map(|(id, _)| id).collect()
    }

    /// Check every cross-reference between nodes and edges.
    ///
    /// Returns the first violation found. Intended for tests and debug
    /// assertions; it walks the whole graph.
    pub fn validate(&self) -> GraphResult<()> {
        let mut edges = 0;
        for (id, edge) in self.edges() {
            edges += 1;
            let Some((first, second)) = edge.endpoints() else {
                return Err(self.violation(format!("{id} is live with a missing endpoint")));
            };
            if edge.weight().is_none() {
                return Err(self.violation(format!("{id} is live without a weight")));
            }
            for endpoint in [first, second] {
                match self.node_slot(endpoint) {
                    None => {
                        return Err(self.violation(format!("{id} references dead node {endpoint}")))
                    }
                    Some(node) if !node.has_edge(id) => {
                        return Err(self.violation(format!("{endpoint} does not list {id}")))
                    }
                    Some(_) => {}
                }
            }
        }

        let mut nodes = 0;
        for (id, node) in self.nodes() {
            nodes += 1;
            if !node.is_initialized() {
                return Err(self.violation(format!("{id} is live without a payload")));
            }
            for &edge_id in node.edges() {
                let Some(edge) = self.edge_slot(edge_id) else {
                    return Err(self.violation(format!("{id} lists dead edge {edge_id}")));
                };
                if edge.opposite(id).is_none() {
                    return Err(self.violation(format!("{id} lists {edge_id}, which does not reference it")));
                }
            }
        }

        if nodes != self.node_count || edges != self.edge_count {
            return Err(self.violation(format!(
                "counters say {} nodes / {} edges, arenas hold {nodes} / {edges}",
                self.node_count, self.edge_count
            )));
        }
        Ok(())
    }

    /// Start a new lifetime. When the epoch counter is exhausted the graph
    /// takes a fresh `GraphId`, so handles from every earlier lifetime stay
    /// dead.
    fn next_lifetime(&mut self) {
        match self.epoch.checked_add(1) {
            Some(epoch) => self.epoch = epoch,
            None => {
                let previous = self.id;
                self.id = GraphId::new();
                self.epoch = 0;
                debug!(
                    graph = self.id.raw(),
                    previous = previous.raw(),
                    "epochs exhausted, graph re-identified"
                );
            }
        }
    }

    fn ensure_active(&self) -> GraphResult<()> {
        if self.destroyed {
            warn!(graph = self.id.raw(), "mutation on destroyed graph");
            return Err(GraphError::Destroyed);
        }
        Ok(())
    }

    fn reserve(&self, nodes: usize, edges: usize) -> GraphResult<()> {
        if self.nodes.len() + nodes > SLOT_LIMIT || self.edges.len() + edges > SLOT_LIMIT {
            warn!(graph = self.id.raw(), "slot space exhausted");
            return Err(GraphError::Full);
        }
        Ok(())
    }

    fn owns(&self, graph: GraphId, epoch: u32) -> bool {
        graph == self.id && epoch == self.epoch
    }

    fn node_slot(&self, id: NodeId) -> Option<&Node<D>> {
        if !self.owns(id.graph(), id.epoch()) {
            return None;
        }
        self.nodes.get(id.index())?.as_ref()
    }

    fn node_slot_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        if !self.owns(id.graph(), id.epoch()) {
            return None;
        }
        self.nodes.get_mut(id.index())?.as_mut()
    }

    fn edge_slot(&self, id: EdgeId) -> Option<&Edge<W>> {
        if !self.owns(id.graph(), id.epoch()) {
            return None;
        }
        self.edges.get(id.index())?.as_ref()
    }

    fn edge_slot_mut(&mut self, id: EdgeId) -> Option<&mut Edge<W>> {
        if !self.owns(id.graph(), id.epoch()) {
            return None;
        }
        self.edges.get_mut(id.index())?.as_mut()
    }

    /// Acquire and initialize a node in the next slot. Caller has reserved.
    fn push_node(&mut self, data: D) -> NodeId {
        let mut node: Node<D> = self.recycler.create_or_recycle(self.config.node_size_hint);
        node.init(data);

        let id = NodeId::new(self.id, self.epoch, self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.node_count += 1;
        id
    }

    /// Acquire an edge between two live nodes and attach it to both.
    /// Caller has checked liveness and reserved.
    fn link(&mut self, first: NodeId, second: NodeId, weight: W) -> EdgeId {
        let mut edge: Edge<W> = self.recycler.create_or_recycle(EDGE_SIZE_HINT);
        edge.init(weight, first, second);

        let id = EdgeId::new(self.id, self.epoch, self.edges.len() as u32);
        self.edges.push(Some(edge));
        self.edge_count += 1;

        for endpoint in [first, second] {
            if let Some(node) = self.node_slot_mut(endpoint) {
                node.attach(id);
            }
        }
        id
    }

    /// Remove `id` from the incident sets of both its endpoints.
    fn detach_edge(&mut self, id: EdgeId) {
        let Some((first, second)) = self.edge_slot(id).and_then(Edge::endpoints) else {
            return;
        };
        for endpoint in [first, second] {
            if let Some(node) = self.node_slot_mut(endpoint) {
                node.detach(id);
            }
        }
    }

    /// Vacate an edge slot and return the instance to the recycler.
    fn release_edge(&mut self, id: EdgeId) -> Option<W> {
        let mut edge = self.edges.get_mut(id.index())?.take()?;
        self.edge_count -= 1;
        let weight = edge.take_weight();
        self.recycler.recycle(edge);
        weight
    }

    /// Return every edge, then every node, to the recycler.
    fn release_all(&mut self) {
        for edge in self.edges.drain(..).flatten() {
            self.recycler.recycle(edge);
        }
        for node in self.nodes.drain(..).flatten() {
            self.recycler.recycle(node);
        }
        self.edge_count = 0;
        self.node_count = 0;
    }

    /// Report a broken cross-reference.
    fn violation(&self, detail: String) -> GraphError {
        error!(
            graph = self.id.raw(),
            epoch = self.epoch,
            %detail,
            "graph consistency violation"
        );
        if self.config.strict_consistency {
            panic!("graph consistency violation: {detail}");
        }
        GraphError::Inconsistent(detail)
    }
}

impl<D, W> Default for WeightedGraph<D, W>
where
    D: Send + 'static,
    W: PartialOrd + Send + 'static,
{
    /// A graph with its own private recycler.
    fn default() -> Self {
        Self::new(Arc::new(Recycler::new()))
    }
}

impl<D, W> Drop for WeightedGraph<D, W>
where
    D: Send + 'static,
    W: PartialOrd + Send + 'static,
{
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<D, W> fmt::Debug for WeightedGraph<D, W>
where
    D: Send + 'static,
    W: PartialOrd + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedGraph")
            .field("id", &self.id)
            .field("epoch", &self.epoch)
            .field("destroyed", &self.destroyed)
            .field("nodes", &self.node_count)
            .field("edges", &self.edge_count)
            .finish()
    }
}
