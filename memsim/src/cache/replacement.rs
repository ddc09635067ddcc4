use std::collections::VecDeque;

use crate::config::ReplacementPolicy;

/// # ReplacementTracker
/// the replacement order of the slots in one set.
/// - the front is the next victim, the back is the most recently installed (FIFO)
///   or the most recently referenced (LRU) slot.
/// - the order always holds every slot index exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementTracker {
    Lru(VecDeque<usize>),
    Fifo(VecDeque<usize>),
}

impl ReplacementTracker {
    /// slots are handed out in ascending order while the set is filling up
    pub fn new(policy: ReplacementPolicy, associativity: usize) -> Self {
        let order = (0..associativity).collect();
        match policy {
            ReplacementPolicy::LRU => ReplacementTracker::Lru(order),
            ReplacementPolicy::FIFO => ReplacementTracker::Fifo(order),
        }
    }

    pub fn order(&self) -> &VecDeque<usize> {
        match self {
            ReplacementTracker::Lru(order) | ReplacementTracker::Fifo(order) => order,
        }
    }

    /// the slot to evict next, it stays in the order until it is touched
    pub fn select_victim(&self) -> usize {
        match self.order().front() {
            Some(&slot) => slot,
            None => panic!("replacement order corrupted: the order is empty"),
        }
    }

    /// record a reference to `slot`
    pub fn touch(&mut self, slot: usize, was_hit: bool) {
        let reorder = match self {
            ReplacementTracker::Lru(_) => true,
            // fifo only cares about installs
            ReplacementTracker::Fifo(_) => !was_hit,
        };
        let order = match self {
            ReplacementTracker::Lru(order) | ReplacementTracker::Fifo(order) => order,
        };
        let pos = order
            .iter()
            .position(|&s| s == slot)
            .unwrap_or_else(|| panic!("replacement order corrupted: slot {slot} is missing"));
        if reorder {
            order.remove(pos);
            order.push_back(slot);
        }
    }
}
