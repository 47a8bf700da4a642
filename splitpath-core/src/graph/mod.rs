//! Split-Cost Graph
//!
//! This module implements the bipartite graph of nodes and shared hyperedges
//! and the relaxation engine that computes distances from a root.
//!
//! # Overview
//!
//! - Nodes are points. Each holds its best known distance from the root.
//! - Edges are shared hyperedges with a fixed cost divided evenly among the
//!   nodes attached to them.
//!
//! A run of [`Graph::calculate_dists`] resets every distance and edge cost,
//! zeroes the root and drains a FIFO worklist. A drained node offers its
//! distance to each attached edge; an edge that is reached more cheaply than
//! before commits the new cost and proposes `min_cost + split_cost` to every
//! attached node; nodes that improve are queued again. Costs are
//! non-negative and every queued node strictly improved, so the run ends.
//!
//! # Ownership
//!
//! The graph owns both registries. Nodes and edges refer to each other only
//! through copyable [`NodeId`] / [`EdgeId`] handles, and
//! [`Graph::attach`] updates both sides of a link in one call.

mod edge;
mod node;
mod scheduler;
mod shared;
mod snapshot;

pub use edge::{Edge, EdgeId};
pub use node::{GraphId, Node, NodeId};
pub use scheduler::Worklist;
pub use shared::SharedGraph;
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

use std::time::{Duration, Instant};

use indexmap::map::Entry;
use indexmap::IndexMap;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::events::{EventBus, GraphEvent, SubscriberId};

/// Capability to take ownership of new entities.
///
/// Entities never hold a reference to their owner; whoever constructs one
/// hands it to a registrar explicitly.
pub trait Registrar {
    /// Take ownership of `node` and return its handle.
    fn register_node(&mut self, node: Node) -> Result<NodeId>;

    /// Take ownership of `edge` and return its handle.
    fn register_edge(&mut self, edge: Edge) -> Result<EdgeId>;
}

/// Counters for one relaxation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationStats {
    pub root: NodeId,
    /// Worklist entries drained.
    pub processed: usize,
    /// Worklist entries pushed, root included.
    pub enqueued: usize,
    /// Pushes dropped because the node was already pending.
    pub duplicates_skipped: usize,
    /// Edge costs committed.
    pub edge_improvements: usize,
    /// Node distances committed, root excluded.
    pub node_improvements: usize,
    pub elapsed: Duration,
}

impl RelaxationStats {
    fn new(root: NodeId) -> Self {
        Self {
            root,
            processed: 0,
            enqueued: 0,
            duplicates_skipped: 0,
            edge_improvements: 0,
            node_improvements: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Outcome of [`Graph::order_graph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderReport {
    /// The node ordering had drifted from the registry and was rebuilt.
    pub nodes_rebuilt: bool,
    /// The edge ordering had drifted from the registry and was rebuilt.
    pub edges_rebuilt: bool,
}

/// The graph: registries, orderings, worklist and event bus.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    config: EngineConfig,

    /// Authoritative node registry. Positions are handle indices.
    nodes: IndexMap<String, Node>,

    /// Authoritative edge registry. Positions are handle indices.
    edges: IndexMap<String, Edge>,

    /// Nodes by ascending distance, as of the last `order_graph`.
    ordered_nodes: Vec<NodeId>,

    /// Edges by ascending `min_cost`, as of the last `order_graph`.
    ordered_edges: Vec<EdgeId>,

    worklist: Worklist,
    bus: EventBus,
}

impl Graph {
    /// Create an empty graph with the default config.
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an empty graph with a validated config.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            id: GraphId::new(),
            worklist: Worklist::new(config.dedupe_worklist),
            config,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            ordered_nodes: Vec::new(),
            ordered_edges: Vec::new(),
            bus: EventBus::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create and register a node.
    pub fn create_node(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.register_node(Node::new(name))
    }

    /// Create and register an edge.
    pub fn create_edge(&mut self, name: impl Into<String>, fixed_cost: f64) -> Result<EdgeId> {
        self.register_edge(Edge::new(name, fixed_cost))
    }

    /// Link a node and an edge, updating both sides.
    ///
    /// Returns `Ok(false)` if they were already linked.
    pub fn attach(&mut self, node: NodeId, edge: EdgeId) -> Result<bool> {
        let (node_index, edge_index) = (self.node_index(node)?, self.edge_index(edge)?);

        let (node_name, node_entry) = self
            .nodes
            .get_index_mut(node_index)
            .ok_or(GraphError::UnknownNode(node))?;
        let (edge_name, edge_entry) = self
            .edges
            .get_index_mut(edge_index)
            .ok_or(GraphError::UnknownEdge(edge))?;

        let linked = node_entry.add_edge(edge_name, edge);
        let back_linked = edge_entry.add_node(node_name, node);
        debug_assert_eq!(linked, back_linked, "adjacency out of sync");

        if linked {
            trace!(
                node = %node_name,
                edge = %edge_name,
                split = edge_entry.split_cost(),
                "attached"
            );
            self.bus.publish(&GraphEvent::Attached { node, edge });
        }
        Ok(linked)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        let index = self.node_index(id)?;
        self.nodes
            .get_index(index)
            .map(|(_, node)| node)
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        let index = self.edge_index(id)?;
        self.edges
            .get_index(index)
            .map(|(_, edge)| edge)
            .ok_or(GraphError::UnknownEdge(id))
    }

    /// Look up a node handle by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .get_index_of(name)
            .map(|index| NodeId::new(self.id, index))
    }

    /// Look up an edge handle by name.
    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edges
            .get_index_of(name)
            .map(|index| EdgeId::new(self.id, index))
    }

    /// Like [`node_id`](Self::node_id), but an unknown name is an error.
    pub fn node_named(&self, name: &str) -> Result<NodeId> {
        self.node_id(name).ok_or_else(|| GraphError::NodeNotFound(name.to_owned()))
    }

    pub fn edge_named(&self, name: &str) -> Result<EdgeId> {
        self.edge_id(name).ok_or_else(|| GraphError::EdgeNotFound(name.to_owned()))
    }

    pub fn distance_of(&self, node: NodeId) -> Result<f64> {
        self.node(node).map(Node::distance)
    }

    /// The edge's minimal cost from the last run.
    pub fn cost_of(&self, edge: EdgeId) -> Result<f64> {
        self.edge(edge).map(Edge::min_cost)
    }

    pub fn split_cost_of(&self, edge: EdgeId) -> Result<f64> {
        self.edge(edge).map(Edge::split_cost)
    }

    pub fn incident_edges_of(&self, node: NodeId) -> Result<Vec<EdgeId>> {
        Ok(self.node(node)?.edges().values().copied().collect())
    }

    pub fn incident_nodes_of(&self, edge: EdgeId) -> Result<Vec<NodeId>> {
        Ok(self.edge(edge)?.nodes().values().copied().collect())
    }

    /// True if the node was reached in the last run.
    pub fn is_reached(&self, node: NodeId) -> Result<bool> {
        Ok(self.distance_of(node)? < self.config.unreached)
    }

    /// Nodes in registry order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let graph = self.id;
        self.nodes
            .values()
            .enumerate()
            .map(move |(index, node)| (NodeId::new(graph, index), node))
    }

    /// Edges in registry order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        let graph = self.id;
        self.edges
            .values()
            .enumerate()
            .map(move |(index, edge)| (EdgeId::new(graph, index), edge))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node ordering as of the last [`order_graph`](Self::order_graph).
    pub fn ordered_nodes(&self) -> &[NodeId] {
        &self.ordered_nodes
    }

    /// Edge ordering as of the last [`order_graph`](Self::order_graph).
    pub fn ordered_edges(&self) -> &[EdgeId] {
        &self.ordered_edges
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Add a collaborator callback. See [`crate::events`].
    pub fn subscribe<F>(&mut self, notify: F) -> SubscriberId
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(notify)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Relaxation
    // ------------------------------------------------------------------

    /// Compute distances from `root` to every node.
    ///
    /// Unreachable nodes and edges keep the unreached sentinel.
    pub fn calculate_dists(&mut self, root: NodeId) -> Result<RelaxationStats> {
        let root_index = self.node_index(root)?;
        let started = Instant::now();
        let unreached = self.config.unreached;

        for node in self.nodes.values_mut() {
            node.set_distance(unreached);
            node.set_in_queue(false);
        }
        for edge in self.edges.values_mut() {
            edge.reset_min_cost(unreached);
        }
        self.worklist.clear();

        let mut stats = RelaxationStats::new(root);
        self.commit_distance(root_index, root, 0.0);
        self.enqueue(root_index, root, &mut stats);

        while let Some(id) = self.worklist.pop() {
            let index = id.index();
            if !self.worklist.is_pending(id) {
                if let Some((_, node)) = self.nodes.get_index_mut(index) {
                    node.set_in_queue(false);
                }
            }
            stats.processed += 1;
            self.process_node(index, &mut stats);
        }

        stats.elapsed = started.elapsed();
        debug!(
            root = %root,
            processed = stats.processed,
            enqueued = stats.enqueued,
            duplicates_skipped = stats.duplicates_skipped,
            edge_improvements = stats.edge_improvements,
            node_improvements = stats.node_improvements,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "relaxation finished"
        );
        Ok(stats)
    }

    /// Diagnostic: run from a randomly chosen node and log the timing.
    pub fn calculate_dists_from_random(&mut self) -> Result<RelaxationStats> {
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        let index = rand::thread_rng().gen_range(0..self.nodes.len());
        let root = NodeId::new(self.id, index);

        let stats = self.calculate_dists(root)?;
        info!(
            root = self.nodes.get_index(index).map(|(name, _)| name.as_str()).unwrap_or("?"),
            elapsed_ms = stats.elapsed.as_secs_f64() * 1e3,
            "calculated distances"
        );
        Ok(stats)
    }

    /// Offer a drained node's distance to each of its edges.
    fn process_node(&mut self, index: usize, stats: &mut RelaxationStats) {
        let pushes: SmallVec<[(EdgeId, f64); 8]> = match self.nodes.get_index(index) {
            Some((_, node)) => node.process().collect(),
            None => return,
        };
        for (edge, distance) in pushes {
            self.relax_edge(edge, distance, stats);
        }
    }

    /// One edge relaxation: commit the edge if reached more cheaply, then
    /// push `min_cost + split_cost` onward to every attached node.
    fn relax_edge(&mut self, edge: EdgeId, distance: f64, stats: &mut RelaxationStats) {
        let Some((_, entry)) = self.edges.get_index_mut(edge.index()) else {
            return;
        };
        let Some(proposed) = entry.set_cost(distance) else {
            return;
        };
        let min_cost = entry.min_cost();
        let targets: SmallVec<[NodeId; 8]> = entry.nodes().values().copied().collect();

        stats.edge_improvements += 1;
        self.bus
            .publish_with(|| GraphEvent::EdgeCostChanged { edge, min_cost });

        for target in targets {
            let index = target.index();
            let improves = self
                .nodes
                .get_index(index)
                .is_some_and(|(_, node)| proposed < node.distance());
            if improves {
                stats.node_improvements += 1;
                self.commit_distance(index, target, proposed);
                self.enqueue(index, target, stats);
            }
        }
    }

    fn commit_distance(&mut self, index: usize, id: NodeId, distance: f64) {
        if let Some((_, node)) = self.nodes.get_index_mut(index) {
            node.set_distance(distance);
        }
        self.bus
            .publish_with(|| GraphEvent::DistanceChanged { node: id, distance });
    }

    fn enqueue(&mut self, index: usize, id: NodeId, stats: &mut RelaxationStats) {
        if self.worklist.push(id) {
            stats.enqueued += 1;
            if let Some((_, node)) = self.nodes.get_index_mut(index) {
                node.set_in_queue(true);
            }
            trace!(node = %id, "enqueued");
        } else {
            stats.duplicates_skipped += 1;
        }
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Reconcile the orderings with the registries, then stable-sort nodes by
    /// distance and edges by `min_cost`.
    ///
    /// An ordering whose length differs from its registry is rebuilt in
    /// registry order first and a warning is logged.
    pub fn order_graph(&mut self) -> OrderReport {
        let mut report = OrderReport::default();
        let graph = self.id;

        if self.ordered_nodes.len() != self.nodes.len() {
            warn!(
                ordered = self.ordered_nodes.len(),
                registered = self.nodes.len(),
                "node ordering inconsistent with registry, rebuilding"
            );
            self.ordered_nodes = (0..self.nodes.len())
                .map(|index| NodeId::new(graph, index))
                .collect();
            report.nodes_rebuilt = true;
        }
        if self.ordered_edges.len() != self.edges.len() {
            warn!(
                ordered = self.ordered_edges.len(),
                registered = self.edges.len(),
                "edge ordering inconsistent with registry, rebuilding"
            );
            self.ordered_edges = (0..self.edges.len())
                .map(|index| EdgeId::new(graph, index))
                .collect();
            report.edges_rebuilt = true;
        }

        let nodes = &self.nodes;
        self.ordered_nodes.sort_by(|a, b| {
            match (nodes.get_index(a.index()), nodes.get_index(b.index())) {
                (Some((_, a)), Some((_, b))) => a.cmp_by_distance(b),
                _ => std::cmp::Ordering::Equal,
            }
        });
        let edges = &self.edges;
        self.ordered_edges.sort_by(|a, b| {
            match (edges.get_index(a.index()), edges.get_index(b.index())) {
                (Some((_, a)), Some((_, b))) => a.cmp_by_min_cost(b),
                _ => std::cmp::Ordering::Equal,
            }
        });

        report
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// A node was selected: recompute distances from it, then ask
    /// collaborators to refresh.
    pub fn on_node_selected(&mut self, node: NodeId) -> Result<RelaxationStats> {
        self.node_index(node)?;
        self.bus.publish(&GraphEvent::NodeSelected { node });
        let stats = self.calculate_dists(node)?;
        self.bus.publish(&GraphEvent::RecomputeRequested);
        Ok(stats)
    }

    /// Recompute distances from `node`. Entry point for presentation layers.
    pub fn recompute_from(&mut self, node: NodeId) -> Result<RelaxationStats> {
        self.on_node_selected(node)
    }

    /// An edge was selected. Only notifies collaborators.
    pub fn on_edge_selected(&mut self, edge: EdgeId) -> Result<()> {
        self.edge_index(edge)?;
        self.bus.publish(&GraphEvent::EdgeSelected { edge });
        self.bus.publish(&GraphEvent::RecomputeRequested);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Debug
    // ------------------------------------------------------------------

    /// Point-in-time copy of every entity, in registry order.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(self)
    }

    /// Log every distance and edge cost at debug level.
    pub fn log_graph(&self) {
        for (name, node) in &self.nodes {
            debug!(node = %name, distance = node.distance(), "node");
        }
        for (name, edge) in &self.edges {
            debug!(edge = %name, min_cost = edge.min_cost(), split = edge.split_cost(), "edge");
        }
    }

    /// Insert into the registry without touching the ordering.
    #[cfg(test)]
    pub(crate) fn register_node_unordered(&mut self, node: Node) -> NodeId {
        let (index, _) = self.nodes.insert_full(node.name().to_owned(), node);
        NodeId::new(self.id, index)
    }

    // ------------------------------------------------------------------
    // Handle validation
    // ------------------------------------------------------------------

    fn node_index(&self, id: NodeId) -> Result<usize> {
        if id.belongs_to(self.id) && id.index() < self.nodes.len() {
            Ok(id.index())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }

    fn edge_index(&self, id: EdgeId) -> Result<usize> {
        if id.belongs_to(self.id) && id.index() < self.edges.len() {
            Ok(id.index())
        } else {
            Err(GraphError::UnknownEdge(id))
        }
    }
}

impl Registrar for Graph {
    fn register_node(&mut self, mut node: Node) -> Result<NodeId> {
        node.set_distance(self.config.unreached);
        node.set_in_queue(false);

        let index = self.nodes.len();
        let id = NodeId::new(self.id, index);
        match self.nodes.entry(node.name().to_owned()) {
            Entry::Occupied(slot) => Err(GraphError::DuplicateNode(slot.key().clone())),
            Entry::Vacant(slot) => {
                debug!(node = %slot.key(), %id, "node registered");
                let name = slot.key().clone();
                slot.insert(node);
                self.ordered_nodes.push(id);
                self.bus
                    .publish_with(|| GraphEvent::NodeRegistered { node: id, name });
                Ok(id)
            }
        }
    }

    fn register_edge(&mut self, mut edge: Edge) -> Result<EdgeId> {
        let cost = edge.fixed_cost();
        if !cost.is_finite() || cost < 0.0 {
            return Err(GraphError::InvalidCost {
                edge: edge.name().to_owned(),
                cost,
            });
        }
        if cost >= self.config.unreached {
            warn!(
                edge = %edge.name(),
                fixed_cost = cost,
                unreached = self.config.unreached,
                "edge cost reaches the unreached value, nodes behind it will read as unreached"
            );
        }
        edge.reset_min_cost(self.config.unreached);

        let index = self.edges.len();
        let id = EdgeId::new(self.id, index);
        match self.edges.entry(edge.name().to_owned()) {
            Entry::Occupied(slot) => Err(GraphError::DuplicateEdge(slot.key().clone())),
            Entry::Vacant(slot) => {
                debug!(edge = %slot.key(), %id, fixed_cost = cost, "edge registered");
                let name = slot.key().clone();
                slot.insert(edge);
                self.ordered_edges.push(id);
                self.bus
                    .publish_with(|| GraphEvent::EdgeRegistered { edge: id, name });
                Ok(id)
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
