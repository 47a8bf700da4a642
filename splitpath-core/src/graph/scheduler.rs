//! Relaxation Worklist
//!
//! The worklist holds the nodes whose distance improved and whose edges
//! therefore need to hear about it. Nodes are drained first-in first-out.
//!
//! # Pending tracking
//!
//! Every push and pop updates a per-node pending count in the same call, so
//! "is this node pending" is always answered from the queue itself rather
//! than from a flag that can drift. With deduplication on, a push for a node
//! that is already pending is dropped: the node will be drained anyway and
//! reads its distance at that point, so the later improvement is not lost.

use std::collections::{HashMap, VecDeque};

use super::node::NodeId;

/// FIFO queue of nodes pending relaxation.
#[derive(Debug, Default)]
pub struct Worklist {
    /// Entries in arrival order.
    queue: VecDeque<NodeId>,

    /// Number of entries per node currently in `queue`.
    pending: HashMap<NodeId, usize>,

    /// Allow at most one entry per node.
    dedupe: bool,
}

impl Worklist {
    /// Create an empty worklist.
    pub fn new(dedupe: bool) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashMap::new(),
            dedupe,
        }
    }

    /// Queue a node. Returns `false` if deduplication dropped the push.
    pub fn push(&mut self, node: NodeId) -> bool {
        let count = self.pending.entry(node).or_insert(0);
        if self.dedupe && *count > 0 {
            return false;
        }
        *count += 1;
        self.queue.push_back(node);
        true
    }

    /// Take the oldest entry.
    pub fn pop(&mut self) -> Option<NodeId> {
        let node = self.queue.pop_front()?;
        if let Some(count) = self.pending.get_mut(&node) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&node);
            }
        }
        Some(node)
    }

    /// True while at least one entry for `node` is queued.
    pub fn is_pending(&self, node: NodeId) -> bool {
        self.pending.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }

    pub fn dedupe(&self) -> bool {
        self.dedupe
    }
}
