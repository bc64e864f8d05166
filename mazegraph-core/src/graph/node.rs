//! Graph Nodes
//!
//! A node holds a payload and the handles of every edge incident to it.
//! The incident set is only ever mutated by the owning graph.

use indexmap::IndexSet;

use super::id::EdgeId;
use crate::recycler::Recyclable;

/// A vertex of a [`WeightedGraph`](super::WeightedGraph).
///
/// Nodes come out of the recycler blank; the graph calls [`Node::init`]
/// before linking them in and [`Node::destroy`] after every incident edge
/// has been detached.
#[derive(Debug)]
pub struct Node<D> {
    /// Payload. `None` only while the node is blank.
    data: Option<D>,

    /// Incident edges. A self-loop appears once.
    edges: IndexSet<EdgeId>,
}

impl<D> Node<D> {
    /// Set the payload and start with no incident edges.
    ///
    /// Safe to call on a freshly recycled instance or to re-initialize a
    /// live one.
    pub fn init(&mut self, data: D) {
        self.data = Some(data);
        self.edges.clear();
    }

    /// Clear the payload and the incident set.
    ///
    /// This does not detach edges from the graph; the graph does that first.
    pub fn destroy(&mut self) {
        self.data = None;
        self.edges.clear();
    }

    /// Take the payload out, leaving the node blank.
    pub(crate) fn take_data(&mut self) -> Option<D> {
        self.data.take()
    }

    /// True between `init` and `destroy`.
    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    /// The payload, or `None` before `init`.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// Mutable payload.
    pub fn data_mut(&mut self) -> Option<&mut D> {
        self.data.as_mut()
    }

    /// Handles of all incident edges.
    pub fn edges(&self) -> &IndexSet<EdgeId> {
        &self.edges
    }

    /// Number of incident edges. A self-loop counts once.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Whether `edge` is in the incident set.
    pub fn has_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    pub(crate) fn attach(&mut self, edge: EdgeId) {
        self.edges.insert(edge);
    }

    /// Returns whether the edge was present.
    pub(crate) fn detach(&mut self, edge: EdgeId) -> bool {
        self.edges.shift_remove(&edge)
    }
}

impl<D: Send + 'static> Recyclable for Node<D> {
    fn blank(size_hint: usize) -> Self {
        Self {
            data: None,
            edges: IndexSet::with_capacity(size_hint),
        }
    }

    fn destroy(&mut self) {
        Node::destroy(self);
    }
}
