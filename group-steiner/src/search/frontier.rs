//! Priority queue of open states with decrease-key by lazy deletion.
//!
//! Every improvement pushes a fresh heap entry; the `live` map holds the
//! priority each open state is currently queued at, and entries that no
//! longer match it are skipped when they surface.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use common::Weight;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use crate::search::state::StateKey;

/// Heap entry. Lower priority first, then the larger cost, then the smaller key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: OrderedFloat<Weight>,
    cost: Reverse<OrderedFloat<Weight>>,
    key: StateKey,
}

/// A state taken off the frontier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popped {
    pub key: StateKey,
    pub priority: Weight,
}

#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    live: HashMap<StateKey, Weight>,
    stale: u64,
}

impl PriorityFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open states.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Heap entries discarded because a better entry superseded them.
    pub fn stale_count(&self) -> u64 {
        self.stale
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.live.contains_key(&key)
    }

    /// Queues `key` at `priority`, or lowers its priority if already queued.
    ///
    /// Returns `false` if the state is already queued at a priority no
    /// greater than `priority`.
    pub fn upsert(&mut self, key: StateKey, priority: Weight, cost: Weight) -> bool {
        if let Some(&current) = self.live.get(&key) {
            if current <= priority {
                return false;
            }
        }
        self.live.insert(key, priority);
        self.heap.push(Reverse(FrontierEntry {
            priority: OrderedFloat(priority),
            cost: Reverse(OrderedFloat(cost)),
            key,
        }));
        true
    }

    /// Removes and returns the open state with the smallest priority.
    pub fn pop(&mut self) -> Option<Popped> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if self.is_current(&entry) {
                self.live.remove(&entry.key);
                return Some(Popped {
                    key: entry.key,
                    priority: entry.priority.0,
                });
            }
            self.stale += 1;
        }
        None
    }

    /// Smallest priority among open states.
    pub fn peek_priority(&mut self) -> Option<Weight> {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if self.is_current(entry) {
                return Some(entry.priority.0);
            }
            self.heap.pop();
            self.stale += 1;
        }
        None
    }

    fn is_current(&self, entry: &FrontierEntry) -> bool {
        self.live
            .get(&entry.key)
            .is_some_and(|&p| p == entry.priority.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::LabelMask;
    use common::VertexId;

    fn key(v: usize) -> StateKey {
        StateKey::new(VertexId::new(v), LabelMask::single(0))
    }

    #[test]
    fn test_pops_in_priority_order() {
        let mut frontier = PriorityFrontier::new();
        frontier.upsert(key(0), 3.0, 3.0);
        frontier.upsert(key(1), 1.0, 1.0);
        frontier.upsert(key(2), 2.0, 2.0);
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|p| p.key.vertex.index())
            .collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_decrease_key_skips_stale() {
        let mut frontier = PriorityFrontier::new();
        assert!(frontier.upsert(key(0), 5.0, 5.0));
        assert!(!frontier.upsert(key(0), 6.0, 6.0));
        assert!(frontier.upsert(key(0), 2.0, 2.0));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.peek_priority(), Some(2.0));

        let popped = frontier.pop().unwrap();
        assert_eq!(popped.priority, 2.0);
        assert!(frontier.pop().is_none());
        assert_eq!(frontier.stale_count(), 1);
    }

    #[test]
    fn test_ties_prefer_larger_cost() {
        let mut frontier = PriorityFrontier::new();
        frontier.upsert(key(0), 4.0, 1.0);
        frontier.upsert(key(1), 4.0, 3.0);
        assert_eq!(frontier.pop().unwrap().key, key(1));
        assert_eq!(frontier.pop().unwrap().key, key(0));
    }
}
