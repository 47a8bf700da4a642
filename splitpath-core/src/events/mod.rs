//! Graph Events
//!
//! Collaborators outside the relaxation engine (rendering, layout, input
//! handling) learn about changes through a per-graph [`EventBus`].
//!
//! Delivery is synchronous and in subscription order: the publisher's call
//! stack contains every subscriber's callback. There is no queuing and no
//! replay, so a subscriber added late never sees earlier events.

mod bus;
mod subscriber;

pub use bus::EventBus;
pub use subscriber::{Subscriber, SubscriberId};

use serde::Serialize;

use crate::graph::{EdgeId, NodeId};

/// Something a collaborator may need to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphEvent {
    /// A node was registered. Renderers allocate its visual here.
    NodeRegistered { node: NodeId, name: String },

    /// An edge was registered.
    EdgeRegistered { edge: EdgeId, name: String },

    /// A new node/edge link was created.
    Attached { node: NodeId, edge: EdgeId },

    /// A node's distance was committed during relaxation.
    DistanceChanged { node: NodeId, distance: f64 },

    /// An edge's minimal cost was committed during relaxation.
    EdgeCostChanged { edge: EdgeId, min_cost: f64 },

    /// A node was selected as the new root.
    NodeSelected { node: NodeId },

    /// An edge was selected. No algorithmic effect.
    EdgeSelected { edge: EdgeId },

    /// Selection handling finished; layout may need to run again.
    RecomputeRequested,
}
