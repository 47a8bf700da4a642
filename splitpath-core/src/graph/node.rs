//! Graph Nodes
//!
//! A node is a point in the graph. It carries its current best distance from
//! the active root and the set of edges it is attached to.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::edge::EdgeId;
use crate::config::DEFAULT_UNREACHED;

/// Unique identifier for a graph instance.
///
/// Handles carry the id of the graph that issued them so a handle from one
/// graph is never silently accepted by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(u64);

impl GraphId {
    /// Generate a new unique graph ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, AtomicOrdering::Relaxed))
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

/// Handle to a node registered in a [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    pub(crate) fn new(graph: GraphId, index: usize) -> Self {
        Self {
            graph: graph.raw(),
            index,
        }
    }

    /// Position of the node in its graph's registry.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn belongs_to(&self, graph: GraphId) -> bool {
        self.graph == graph.raw()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}@g{}", self.index, self.graph)
    }
}

/// A node in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Caller-supplied name, unique among nodes of one graph.
    name: String,

    /// Best known cost from the active root.
    distance: f64,

    /// True while the node has a pending worklist entry.
    in_queue: bool,

    /// Attached edges, keyed by edge name.
    edges: IndexMap<String, EdgeId>,
}

impl Node {
    /// Create an unattached, unreached node.
    ///
    /// The node is inert until handed to a [`Registrar`](super::Registrar).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distance: DEFAULT_UNREACHED,
            in_queue: false,
            edges: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    pub fn is_in_queue(&self) -> bool {
        self.in_queue
    }

    pub fn set_in_queue(&mut self, in_queue: bool) {
        self.in_queue = in_queue;
    }

    /// Record an attached edge. Returns `false` if an edge with this name is
    /// already attached, in which case nothing changes.
    ///
    /// Only one half of the link; [`Graph::attach`](super::Graph::attach)
    /// updates both sides together.
    pub(crate) fn add_edge(&mut self, edge_name: &str, edge: EdgeId) -> bool {
        if self.edges.contains_key(edge_name) {
            return false;
        }
        self.edges.insert(edge_name.to_owned(), edge);
        true
    }

    /// Attached edges keyed by name.
    pub fn edges(&self) -> &IndexMap<String, EdgeId> {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// The pushes this node makes when drained: its current distance offered
    /// to every attached edge.
    pub fn process(&self) -> impl Iterator<Item = (EdgeId, f64)> + '_ {
        let distance = self.distance;
        self.edges.values().map(move |&edge| (edge, distance))
    }

    /// Presentation ordering: ascending distance.
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance)
    }
}
