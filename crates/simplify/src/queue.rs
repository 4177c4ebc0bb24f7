//! Mutable min-priority queue of edge collapse costs.
//!
//! A collapse changes the cost of several edges around the merged vertex and
//! retires a few others, so the queue must support removal and re-keying of
//! arbitrary entries, not just pop-min. Entries live in an ordered set keyed
//! by `(cost, edge)`; each [`crate::cost::EdgeRecord`] caches its current key
//! and uses it as the handle for O(log n) update and erase.
//!
//! Equal costs are ordered by edge id, so the collapse order is fully
//! deterministic.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::half_edge::EdgeId;

/// Queue entry and handle: the cost an edge was queued with plus its id
#[derive(Debug, Clone, Copy)]
pub struct QueueKey {
    pub cost: f64,
    pub edge: EdgeId,
}

impl PartialEq for QueueKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueKey {}

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.edge.cmp(&other.edge))
    }
}

/// Min-priority queue over edge costs
#[derive(Debug, Clone, Default)]
pub struct CollapseQueue {
    entries: BTreeSet<QueueKey>,
}

impl CollapseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge and return its handle
    pub fn push(&mut self, edge: EdgeId, cost: f64) -> QueueKey {
        let key = QueueKey { cost, edge };
        self.entries.insert(key);
        key
    }

    /// Re-key an edge. A missing `old` handle simply inserts.
    pub fn update(&mut self, old: Option<QueueKey>, edge: EdgeId, cost: f64) -> QueueKey {
        if let Some(old) = old {
            self.entries.remove(&old);
        }
        self.push(edge, cost)
    }

    /// Erase an entry by handle. Returns false if it was not queued.
    pub fn remove(&mut self, key: QueueKey) -> bool {
        self.entries.remove(&key)
    }

    /// Cheapest entry without removing it
    pub fn peek(&self) -> Option<QueueKey> {
        self.entries.first().copied()
    }

    /// Remove and return the cheapest entry
    pub fn pop(&mut self) -> Option<QueueKey> {
        self.entries.pop_first()
    }

    pub fn contains(&self, key: QueueKey) -> bool {
        self.entries.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
