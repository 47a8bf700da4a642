//! Python-exposed graph.
//!
//! Entities are addressed by name on the Python side; handles stay internal.

use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::graph::{EdgeId, Graph, NodeId};

#[pyclass(name = "Graph")]
pub struct PyGraph {
    graph: Graph,
}

impl PyGraph {
    fn node(&self, name: &str) -> PyResult<NodeId> {
        Ok(self.graph.node_named(name)?)
    }

    fn edge(&self, name: &str) -> PyResult<EdgeId> {
        Ok(self.graph.edge_named(name)?)
    }
}

#[pymethods]
impl PyGraph {
    /// Create an empty graph, optionally from a JSON engine config.
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<&str>) -> PyResult<Self> {
        let config = match config {
            Some(json) => EngineConfig::from_json(json)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            graph: Graph::with_config(config)?,
        })
    }

    fn create_node(&mut self, name: &str) -> PyResult<()> {
        self.graph.create_node(name)?;
        Ok(())
    }

    fn create_edge(&mut self, name: &str, fixed_cost: f64) -> PyResult<()> {
        self.graph.create_edge(name, fixed_cost)?;
        Ok(())
    }

    /// Link a node and an edge. Returns False if they were already linked.
    fn attach(&mut self, node: &str, edge: &str) -> PyResult<bool> {
        let (node, edge) = (self.node(node)?, self.edge(edge)?);
        Ok(self.graph.attach(node, edge)?)
    }

    /// Recompute distances from `node`. Returns the number of nodes drained.
    fn recompute_from(&mut self, node: &str) -> PyResult<usize> {
        let node = self.node(node)?;
        Ok(self.graph.recompute_from(node)?.processed)
    }

    fn distance_of(&self, node: &str) -> PyResult<f64> {
        Ok(self.graph.distance_of(self.node(node)?)?)
    }

    fn cost_of(&self, edge: &str) -> PyResult<f64> {
        Ok(self.graph.cost_of(self.edge(edge)?)?)
    }

    /// Node and edge names sorted by distance / minimal cost.
    fn order(&mut self) -> (Vec<String>, Vec<String>) {
        self.graph.order_graph();
        let nodes = self
            .graph
            .ordered_nodes()
            .iter()
            .filter_map(|&id| self.graph.node(id).ok())
            .map(|node| node.name().to_owned())
            .collect();
        let edges = self
            .graph
            .ordered_edges()
            .iter()
            .filter_map(|&id| self.graph.edge(id).ok())
            .map(|edge| edge.name().to_owned())
            .collect();
        (nodes, edges)
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.graph.snapshot().to_json()?)
    }

    fn __len__(&self) -> usize {
        self.graph.node_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "Graph(nodes={}, edges={})",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }
}
