use crate::config::ReplacementPolicy;

use super::{AccessResult, CacheBlock, Operation, ReplacementTracker};

/// one associative set, write-back and write-allocate
#[derive(Debug, Clone)]
pub struct CacheSet {
    blocks: Vec<CacheBlock>,
    tracker: ReplacementTracker,
}

impl CacheSet {
    pub fn new(associativity: usize, policy: ReplacementPolicy) -> Self {
        CacheSet {
            blocks: vec![CacheBlock::default(); associativity],
            tracker: ReplacementTracker::new(policy, associativity),
        }
    }

    pub fn access(&mut self, tag: u64, block_number: u64, operation: Operation) -> AccessResult {
        let is_write = operation == Operation::Write;
        if let Some(slot) = self.blocks.iter().position(|block| block.holds(tag)) {
            if is_write {
                self.blocks[slot].mark_dirty();
            }
            self.tracker.touch(slot, true);
            return AccessResult::Hit(slot);
        }
        // not in the set, take the slot the tracker gives us
        let victim = self.tracker.select_victim();
        tracing::trace!(victim, tag, block_number, "install");
        self.blocks[victim].install(tag, block_number, is_write);
        self.tracker.touch(victim, false);
        AccessResult::Miss(victim)
    }

    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    pub fn tracker(&self) -> &ReplacementTracker {
        &self.tracker
    }

    pub fn associativity(&self) -> usize {
        self.blocks.len()
    }
}
