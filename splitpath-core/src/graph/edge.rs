//! Graph Edges
//!
//! An edge is a shared hyperedge with a fixed total cost. The cost is split
//! evenly among the nodes currently attached, so the per-node share falls as
//! more nodes attach.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::node::{GraphId, NodeId};
use crate::config::DEFAULT_UNREACHED;

/// Handle to an edge registered in a [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId {
    graph: u64,
    index: usize,
}

impl EdgeId {
    pub(crate) fn new(graph: GraphId, index: usize) -> Self {
        Self {
            graph: graph.raw(),
            index,
        }
    }

    /// Position of the edge in its graph's registry.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn belongs_to(&self, graph: GraphId) -> bool {
        self.graph == graph.raw()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}@g{}", self.index, self.graph)
    }
}

/// A hyperedge in the graph.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Caller-supplied name, unique among edges of one graph.
    name: String,

    /// Total cost, fixed at construction.
    fixed_cost: f64,

    /// Cheapest total cost at which this edge has been reached in the
    /// current run.
    min_cost: f64,

    /// `fixed_cost / max(degree, 1)`.
    split_cost: f64,

    /// Attached nodes, keyed by node name.
    nodes: IndexMap<String, NodeId>,
}

impl Edge {
    /// Create an unattached, unreached edge.
    ///
    /// The cost is not validated here; registration rejects negative or
    /// non-finite costs.
    pub fn new(name: impl Into<String>, fixed_cost: f64) -> Self {
        Self {
            name: name.into(),
            fixed_cost,
            min_cost: DEFAULT_UNREACHED,
            split_cost: fixed_cost,
            nodes: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    pub fn min_cost(&self) -> f64 {
        self.min_cost
    }

    pub fn split_cost(&self) -> f64 {
        self.split_cost
    }

    /// Record an attached node and recompute the split cost. Returns `false`
    /// if a node with this name is already attached, in which case nothing
    /// changes.
    pub(crate) fn add_node(&mut self, node_name: &str, node: NodeId) -> bool {
        if self.nodes.contains_key(node_name) {
            return false;
        }
        self.nodes.insert(node_name.to_owned(), node);
        self.split_cost = self.fixed_cost / self.nodes.len() as f64;
        true
    }

    /// Attached nodes keyed by name.
    pub fn nodes(&self) -> &IndexMap<String, NodeId> {
        &self.nodes
    }

    pub fn degree(&self) -> usize {
        self.nodes.len()
    }

    pub fn reset_min_cost(&mut self, unreached: f64) {
        self.min_cost = unreached;
    }

    /// Offer the distance of an attached node.
    ///
    /// The edge is reached at `distance + split_cost`. If that beats the
    /// current `min_cost` it is committed and the proposal for every attached
    /// node, `min_cost + split_cost`, is returned. Otherwise returns `None`
    /// and nothing changes.
    ///
    /// The split cost is charged once on arrival and again on departure.
    pub fn set_cost(&mut self, distance: f64) -> Option<f64> {
        let candidate = distance + self.split_cost;
        if candidate >= self.min_cost {
            return None;
        }
        self.min_cost = candidate;
        Some(self.min_cost + self.split_cost)
    }

    /// Presentation ordering: ascending `min_cost`.
    pub fn cmp_by_min_cost(&self, other: &Self) -> Ordering {
        self.min_cost.total_cmp(&other.min_cost)
    }
}
