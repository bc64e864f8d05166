//! Graph Edges
//!
//! An edge is an undirected, weighted connection between two nodes. The
//! first/second order is the order the caller passed them in and carries
//! no meaning beyond that.

use super::id::NodeId;
use crate::recycler::Recyclable;

/// A weighted connection of a [`WeightedGraph`](super::WeightedGraph).
///
/// Every live edge has a weight and both endpoints. A live edge with a
/// missing endpoint is a consistency violation.
#[derive(Debug)]
pub struct Edge<W> {
    weight: Option<W>,
    first: Option<NodeId>,
    second: Option<NodeId>,
}

impl<W> Edge<W> {
    /// Set weight and endpoints. Endpoint liveness is checked by the graph.
    pub fn init(&mut self, weight: W, first: NodeId, second: NodeId) {
        self.weight = Some(weight);
        self.first = Some(first);
        self.second = Some(second);
    }

    /// Clear weight and both endpoints.
    pub fn destroy(&mut self) {
        self.weight = None;
        self.first = None;
        self.second = None;
    }

    pub(crate) fn take_weight(&mut self) -> Option<W> {
        self.weight.take()
    }

    pub(crate) fn set_weight(&mut self, weight: W) -> Option<W> {
        self.weight.replace(weight)
    }

    /// The weight, or `None` before `init`.
    pub fn weight(&self) -> Option<&W> {
        self.weight.as_ref()
    }

    /// First endpoint.
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Second endpoint.
    pub fn second(&self) -> Option<NodeId> {
        self.second
    }

    /// Both endpoints, if both are set.
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        Some((self.first?, self.second?))
    }

    /// The endpoint across from `node`, or `None` if `node` is not an
    /// endpoint. A self-loop returns `node` itself.
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        let (first, second) = self.endpoints()?;
        if first == node {
            Some(second)
        } else if second == node {
            Some(first)
        } else {
            None
        }
    }

    /// True if this edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        match self.endpoints() {
            Some((first, second)) => (first == a && second == b) || (first == b && second == a),
            None => false,
        }
    }

    /// True if both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        matches!(self.endpoints(), Some((first, second)) if first == second)
    }
}

impl<W: Send + 'static> Recyclable for Edge<W> {
    fn blank(_size_hint: usize) -> Self {
        Self {
            weight: None,
            first: None,
            second: None,
        }
    }

    fn destroy(&mut self) {
        Edge::destroy(self);
    }
}
