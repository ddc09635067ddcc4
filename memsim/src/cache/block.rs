use serde::{Deserialize, Serialize};

/// one slot of a cache set
/// - `tag` and `block_number` are `None` until the slot is installed
/// - `block_number` is the memory block the slot holds, it stands in for the data
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBlock {
    pub valid: bool,
    pub dirty: bool,
    pub tag: Option<u64>,
    pub block_number: Option<u64>,
}

impl CacheBlock {
    pub fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == Some(tag)
    }

    /// replace whatever was in the slot
    pub(super) fn install(&mut self, tag: u64, block_number: u64, dirty: bool) {
        self.valid = true;
        self.dirty = dirty;
        self.tag = Some(tag);
        self.block_number = Some(block_number);
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
