//! Thread-safe handle to a graph.
//!
//! The relaxation engine has no internal synchronization, so every entry
//! point goes through a single lock. Event callbacks run while that lock is
//! held and must not call back into the same `SharedGraph`.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Edge, EdgeId, Graph, Node, NodeId, Registrar, RelaxationStats};
use crate::error::Result;
use crate::events::{GraphEvent, SubscriberId};

/// Cloneable, lock-protected graph.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<Mutex<Graph>>,
}

impl SharedGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Run `f` with exclusive access to the graph.
    pub fn with<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn create_node(&self, name: impl Into<String>) -> Result<NodeId> {
        self.inner.lock().create_node(name)
    }

    pub fn create_edge(&self, name: impl Into<String>, fixed_cost: f64) -> Result<EdgeId> {
        self.inner.lock().create_edge(name, fixed_cost)
    }

    pub fn attach(&self, node: NodeId, edge: EdgeId) -> Result<bool> {
        self.inner.lock().attach(node, edge)
    }

    pub fn recompute_from(&self, node: NodeId) -> Result<RelaxationStats> {
        self.inner.lock().recompute_from(node)
    }

    pub fn on_edge_selected(&self, edge: EdgeId) -> Result<()> {
        self.inner.lock().on_edge_selected(edge)
    }

    pub fn distance_of(&self, node: NodeId) -> Result<f64> {
        self.inner.lock().distance_of(node)
    }

    pub fn cost_of(&self, edge: EdgeId) -> Result<f64> {
        self.inner.lock().cost_of(edge)
    }

    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        self.inner.lock().subscribe(notify)
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

impl Registrar for SharedGraph {
    fn register_node(&mut self, node: Node) -> Result<NodeId> {
        self.inner.lock().register_node(node)
    }

    fn register_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        self.inner.lock().register_edge(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_one_graph() {
        let shared = SharedGraph::default();
        let other = shared.clone();

        let a = shared.create_node("A").unwrap();
        let b = other.create_node("B").unwrap();
        let e = other.create_edge("E", 6.0).unwrap();
        shared.attach(a, e).unwrap();
        shared.attach(b, e).unwrap();

        other.recompute_from(a).unwrap();
        assert_eq!(shared.distance_of(b).unwrap(), 6.0);
        assert_eq!(shared.cost_of(e).unwrap(), 3.0);
    }

    #[test]
    fn concurrent_registration_is_serialized() {
        let shared = SharedGraph::default();
        let workers: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared.create_node(format!("n{t}-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        shared.with(|graph| {
            assert_eq!(graph.node_count(), 100);
            assert_eq!(graph.ordered_nodes().len(), 100);
        });
    }

    #[test]
    fn registrar_through_lock() {
        let mut shared = SharedGraph::from(Graph::new());
        let a = shared.register_node(Node::new("A")).unwrap();
        let e = shared.register_edge(Edge::new("E", 1.0)).unwrap();

        assert!(shared.attach(a, e).unwrap());
    }
}
