//! Subscriber types for graph events.
//!
//! A Subscriber is any collaborator that wants to hear about changes to a
//! graph: a renderer allocating visuals for new entities, a layout engine
//! re-deriving sizes after distances change, and so on.

use std::sync::atomic::{AtomicU64, Ordering};

use super::GraphEvent;

/// Unique identifier for a subscriber.
///
/// Returned by [`EventBus::subscribe`](super::EventBus::subscribe) and used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscriber to graph events.
pub struct Subscriber {
    id: SubscriberId,
    /// Invoked synchronously for every published event.
    notify: Box<dyn Fn(&GraphEvent) + Send + Sync>,
}

impl Subscriber {
    /// Create a new subscriber with the given callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            notify: Box::new(notify),
        }
    }

    /// Get the subscriber's unique ID.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Deliver one event.
    pub fn notify(&self, event: &GraphEvent) {
        (self.notify)(event);
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphId, NodeId};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn each_subscriber_gets_its_own_id() {
        let first = Subscriber::new(|_| {});
        let second = Subscriber::new(|_| {});

        assert_ne!(first.id(), second.id());
        assert!(format!("{first:?}").contains("Subscriber"));
    }

    #[test]
    fn notify_hands_over_the_event() {
        let node = NodeId::new(GraphId::new(), 3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let subscriber = Subscriber::new(move |event| {
            if let GraphEvent::DistanceChanged { node, distance } = event {
                sink.lock().push((*node, *distance));
            }
        });

        subscriber.notify(&GraphEvent::RecomputeRequested);
        subscriber.notify(&GraphEvent::DistanceChanged {
            node,
            distance: 2.5,
        });

        assert_eq!(*seen.lock(), vec![(node, 2.5)]);
    }
}
