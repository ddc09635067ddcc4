use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::config::CacheParameters;

mod block;
mod cache_set;
mod replacement;

pub use block::CacheBlock;
pub use cache_set::CacheSet;
pub use replacement::ReplacementTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Read,
    Write,
}

/// one memory reference issued by the cpu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReference {
    pub operation: Operation,
    pub address: u64,
}

impl MemoryReference {
    pub fn read(address: u64) -> Self {
        MemoryReference {
            operation: Operation::Read,
            address,
        }
    }
    pub fn write(address: u64) -> Self {
        MemoryReference {
            operation: Operation::Write,
            address,
        }
    }
}

/// the result of a cache access, carries the slot offset inside the set
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumAsInner)]
pub enum AccessResult {
    Hit(usize),
    Miss(usize),
}

impl AccessResult {
    pub fn slot(&self) -> usize {
        match *self {
            AccessResult::Hit(slot) | AccessResult::Miss(slot) => slot,
        }
    }
}

/// Get the len in bits of a u64 int. 0 for anything below 2.
pub fn get_bit_lens(size: u64) -> u64 {
    let mut len: u64 = 0;
    let mut temp = size;
    while temp > 1 {
        temp /= 2;
        len += 1;
    }
    len
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub memory_block_number: u64,
    pub set_index: u64,
    pub tag: u64,
}

/// split an address into the memory block, the set it maps to and its tag
pub fn decode(address: u64, params: &CacheParameters) -> DecodedAddress {
    let memory_block_number = address / params.block_size;
    let num_sets = params.num_sets();
    DecodedAddress {
        memory_block_number,
        set_index: memory_block_number % num_sets,
        tag: memory_block_number / num_sets,
    }
}
