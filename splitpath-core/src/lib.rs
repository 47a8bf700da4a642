//! Splitpath Core
//!
//! Shortest accumulated cost from a root over a bipartite graph of nodes and
//! shared hyperedges. Each edge has a fixed cost that is divided evenly among
//! the nodes currently attached to it, so traversing a crowded edge is cheap
//! and traversing a lonely one is expensive.
//!
//! # Architecture
//!
//! - `graph`: nodes, edges, the relaxation engine and its worklist
//! - `events`: per-graph notifications for rendering/layout collaborators
//! - `config`: engine tunables
//! - `error`: the crate error type
//!
//! # Example
//!
//! ```rust
//! use splitpath_core::Graph;
//!
//! let mut graph = Graph::new();
//! let a = graph.create_node("A")?;
//! let b = graph.create_node("B")?;
//! let e = graph.create_edge("E", 10.0)?;
//! graph.attach(a, e)?;
//! graph.attach(b, e)?;
//!
//! graph.calculate_dists(a)?;
//! assert_eq!(graph.distance_of(b)?, 10.0);
//! assert_eq!(graph.cost_of(e)?, 5.0);
//! # Ok::<(), splitpath_core::GraphError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod graph;

#[cfg(feature = "python")]
mod python;

pub use config::EngineConfig;
pub use error::{GraphError, Result};
pub use events::{EventBus, GraphEvent, SubscriberId};
pub use graph::{
    Edge, EdgeId, Graph, GraphSnapshot, Node, NodeId, OrderReport, Registrar, RelaxationStats,
    SharedGraph,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyGraph>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
