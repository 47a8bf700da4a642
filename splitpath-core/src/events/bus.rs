//! Event Bus

use smallvec::SmallVec;

use super::{GraphEvent, Subscriber, SubscriberId};

/// Ordered list of subscribers owned by one graph.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: SmallVec<[Subscriber; 4]>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber at the end of the delivery order.
    pub fn subscribe<F>(&mut self, notify: F) -> SubscriberId
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        let subscriber = Subscriber::new(notify);
        let id = subscriber.id();
        self.subscribers.push(subscriber);
        id
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id() != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub fn publish(&self, event: &GraphEvent) {
        for subscriber in &self.subscribers {
            subscriber.notify(event);
        }
    }

    /// Lazily build and deliver an event, skipping the work when nobody
    /// is listening.
    pub fn publish_with(&self, event: impl FnOnce() -> GraphEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.publish(&event());
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
