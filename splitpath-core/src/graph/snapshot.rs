//! Serializable snapshot of a graph, for debugging and tooling.

use serde::Serialize;

use super::Graph;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub distance: f64,
    /// Names of attached edges.
    pub edges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub name: String,
    pub fixed_cost: f64,
    pub split_cost: f64,
    pub min_cost: f64,
    /// Names of attached nodes.
    pub nodes: Vec<String>,
}

/// Every node and edge in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub(crate) fn capture(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(_, node)| NodeSnapshot {
                name: node.name().to_owned(),
                distance: node.distance(),
                edges: node.edges().keys().cloned().collect(),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|(_, edge)| EdgeSnapshot {
                name: edge.name().to_owned(),
                fixed_cost: edge.fixed_cost(),
                split_cost: edge.split_cost(),
                min_cost: edge.min_cost(),
                nodes: edge.nodes().keys().cloned().collect(),
            })
            .collect();
        Self { nodes, edges }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn captures_registry_order_and_links() {
        let mut graph = Graph::new();
        let b = graph.create_node("B").unwrap();
        let a = graph.create_node("A").unwrap();
        let e = graph.create_edge("E", 10.0).unwrap();
        graph.attach(b, e).unwrap();
        graph.attach(a, e).unwrap();
        graph.calculate_dists(a).unwrap();

        let snap = graph.snapshot();

        let names: Vec<_> = snap.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(snap.nodes[0].distance, 10.0);
        assert_eq!(snap.edges[0].nodes, ["B", "A"]);
        assert_eq!(snap.edges[0].split_cost, 5.0);
        assert_eq!(snap.edges[0].min_cost, 5.0);
    }

    #[test]
    fn json_has_named_fields() {
        let mut graph = Graph::new();
        graph.create_node("A").unwrap();
        graph.create_edge("E", 2.0).unwrap();

        let json = graph.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"][0]["name"], "A");
        assert_eq!(value["edges"][0]["fixed_cost"], 2.0);
    }
}
