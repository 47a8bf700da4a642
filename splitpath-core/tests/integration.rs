//! Integration Tests for the Relaxation Engine
//!
//! These tests drive the public API the way a presentation layer would:
//! build a graph, select nodes, and observe the events that come back.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use splitpath_core::{
    Edge, EngineConfig, Graph, GraphError, GraphEvent, Node, NodeId, Registrar,
};

fn record(graph: &mut Graph) -> Arc<Mutex<Vec<GraphEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    graph.subscribe(move |event| sink.lock().push(event.clone()));
    log
}

/// A single node with no edges only ever sees itself.
#[test]
fn lone_root() {
    let mut graph = Graph::new();
    let a = graph.create_node("A").unwrap();

    graph.calculate_dists(a).unwrap();

    assert_eq!(graph.distance_of(a).unwrap(), 0.0);
    assert_eq!(graph.edge_count(), 0);
}

/// Two nodes sharing one edge of cost 10.
#[test]
fn shared_edge_between_two_nodes() {
    let mut graph = Graph::new();
    let a = graph.create_node("A").unwrap();
    let b = graph.create_node("B").unwrap();
    let e = graph.create_edge("E", 10.0).unwrap();
    graph.attach(a, e).unwrap();
    graph.attach(b, e).unwrap();
    assert_eq!(graph.split_cost_of(e).unwrap(), 5.0);

    graph.calculate_dists(a).unwrap();

    assert_eq!(graph.distance_of(a).unwrap(), 0.0);
    assert_eq!(graph.distance_of(b).unwrap(), 10.0);
    assert_eq!(graph.cost_of(e).unwrap(), 5.0);
}

/// The per-node share falls as nodes attach.
#[test]
fn split_cost_follows_degree() {
    let mut graph = Graph::new();
    let e = graph.create_edge("E", 10.0).unwrap();
    let nodes: Vec<NodeId> = ["A", "B", "C"]
        .iter()
        .map(|name| graph.create_node(*name).unwrap())
        .collect();

    graph.attach(nodes[0], e).unwrap();
    graph.attach(nodes[1], e).unwrap();
    assert_eq!(graph.split_cost_of(e).unwrap(), 5.0);

    graph.attach(nodes[2], e).unwrap();
    assert_eq!(graph.split_cost_of(e).unwrap(), 10.0 / 3.0);

    // Re-attaching changes nothing.
    assert!(!graph.attach(nodes[2], e).unwrap());
    assert_eq!(graph.split_cost_of(e).unwrap(), 10.0 / 3.0);
}

/// A cheaper route found later replaces an earlier, dearer one.
#[test]
fn later_cheaper_route_wins() {
    // A reaches C directly over an expensive edge, or via B over two cheap ones.
    let mut graph = Graph::new();
    let a = graph.create_node("A").unwrap();
    let b = graph.create_node("B").unwrap();
    let c = graph.create_node("C").unwrap();
    let direct = graph.create_edge("direct", 100.0).unwrap();
    let first = graph.create_edge("first", 2.0).unwrap();
    let second = graph.create_edge("second", 2.0).unwrap();
    let links = [
        (a, direct),
        (c, direct),
        (a, first),
        (b, first),
        (b, second),
        (c, second),
    ];
    for (node, edge) in links {
        graph.attach(node, edge).unwrap();
    }

    graph.calculate_dists(a).unwrap();

    // first: reached at 1, B = 2; second: reached at 3, C = 4.
    assert_eq!(graph.distance_of(b).unwrap(), 2.0);
    assert_eq!(graph.distance_of(c).unwrap(), 4.0);
    assert_eq!(graph.cost_of(direct).unwrap(), 50.0);
}

#[test]
fn registration_events_in_order() {
    let mut graph = Graph::new();
    let log = record(&mut graph);

    let a = graph.create_node("A").unwrap();
    let e = graph.create_edge("E", 1.0).unwrap();
    graph.attach(a, e).unwrap();
    graph.attach(a, e).unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            GraphEvent::NodeRegistered { node: a, name: "A".into() },
            GraphEvent::EdgeRegistered { edge: e, name: "E".into() },
            GraphEvent::Attached { node: a, edge: e },
        ]
    );
}

#[test]
fn node_selection_relaxes_then_requests_recompute() {
    let mut graph = Graph::new();
    let a = graph.create_node("A").unwrap();
    let b = graph.create_node("B").unwrap();
    let e = graph.create_edge("E", 10.0).unwrap();
    graph.attach(a, e).unwrap();
    graph.attach(b, e).unwrap();
    let log = record(&mut graph);

    graph.on_node_selected(b).unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            GraphEvent::NodeSelected { node: b },
            GraphEvent::DistanceChanged { node: b, distance: 0.0 },
            GraphEvent::EdgeCostChanged { edge: e, min_cost: 5.0 },
            GraphEvent::DistanceChanged { node: a, distance: 10.0 },
            GraphEvent::RecomputeRequested,
        ]
    );
    assert_eq!(graph.distance_of(a).unwrap(), 10.0);
}

#[test]
fn edge_selection_only_notifies() {
    let mut graph = Graph::new();
    let a = graph.create_node("A").unwrap();
    let e = graph.create_edge("E", 4.0).unwrap();
    graph.attach(a, e).unwrap();
    graph.calculate_dists(a).unwrap();
    let log = record(&mut graph);

    graph.on_edge_selected(e).unwrap();

    assert_eq!(
        *log.lock(),
        vec![GraphEvent::EdgeSelected { edge: e }, GraphEvent::RecomputeRequested]
    );
    assert_eq!(graph.cost_of(e).unwrap(), 4.0);
}

#[test]
fn selecting_foreign_node_fails() {
    let mut graph = Graph::new();
    graph.create_node("A").unwrap();
    let mut other = Graph::new();
    let stranger = other.create_node("A").unwrap();
    let log = record(&mut graph);

    let err = graph.recompute_from(stranger).unwrap_err();

    assert!(matches!(err, GraphError::UnknownNode(id) if id == stranger));
    assert!(log.lock().is_empty());
}

#[test]
fn graphs_register_only_their_own_entities() {
    let mut left = Graph::new();
    let mut right = Graph::new();
    let left_log = record(&mut left);

    left.register_node(Node::new("shared-name")).unwrap();
    right.register_node(Node::new("shared-name")).unwrap();
    right.register_edge(Edge::new("E", 1.0)).unwrap();

    assert_eq!(left.node_count(), 1);
    assert_eq!(right.node_count(), 1);
    assert_eq!(left_log.lock().len(), 1);
}

#[test]
fn subscribers_added_late_see_nothing_earlier() {
    let mut graph = Graph::new();
    graph.create_node("A").unwrap();
    let log = record(&mut graph);

    assert!(log.lock().is_empty());
    graph.create_node("B").unwrap();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn config_from_json_drives_sentinel() {
    let config =
        EngineConfig::from_json(r#"{ "unreached": 500.0, "dedupe_worklist": false }"#).unwrap();
    let mut graph = Graph::with_config(config).unwrap();
    let a = graph.create_node("A").unwrap();
    let b = graph.create_node("B").unwrap();

    graph.calculate_dists(a).unwrap();

    assert_eq!(graph.distance_of(b).unwrap(), 500.0);
    assert!(!graph.is_reached(b).unwrap());
    assert!(Graph::with_config(EngineConfig {
        unreached: f64::NAN,
        ..EngineConfig::default()
    })
    .is_err());
}

#[test]
fn ordering_after_selection() {
    let mut graph = Graph::new();
    let names = ["w", "x", "y", "z"];
    let nodes: Vec<NodeId> = names.iter().map(|n| graph.create_node(*n).unwrap()).collect();
    // Chain w - x - y - z with growing costs.
    for (i, window) in nodes.windows(2).enumerate() {
        let e = graph.create_edge(format!("e{i}"), 2.0 * (i + 1) as f64).unwrap();
        graph.attach(window[0], e).unwrap();
        graph.attach(window[1], e).unwrap();
    }

    graph.recompute_from(nodes[3]).unwrap();
    graph.order_graph();

    let ordered: Vec<&str> = graph
        .ordered_nodes()
        .iter()
        .map(|&id| graph.node(id).unwrap().name())
        .collect();
    assert_eq!(ordered, vec!["z", "y", "x", "w"]);
}
