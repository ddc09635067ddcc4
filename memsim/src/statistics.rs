use std::{fs::File, path::Path};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::{
    cache::{AccessResult, MemoryReference},
    config::CacheParameters,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitMiss {
    Hit,
    Miss,
}

impl From<AccessResult> for HitMiss {
    fn from(result: AccessResult) -> Self {
        match result {
            AccessResult::Hit(_) => HitMiss::Hit,
            AccessResult::Miss(_) => HitMiss::Miss,
        }
    }
}

/// the record of a single simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub reference: MemoryReference,
    pub memory_block_number: u64,
    pub set_index: u64,
    pub result: HitMiss,
    /// the global slot the block ended up in
    pub slot_number: u64,
}

/// hits of the simulated pass alone
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub hit_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub hit_count: usize,
    pub total_count: usize,
    pub ideal_hit_count: usize,
}

impl RunSummary {
    pub fn new(sequence: SequenceSummary, ideal_hit_count: usize) -> Self {
        RunSummary {
            hit_count: sequence.hit_count,
            total_count: sequence.total_count,
            ideal_hit_count,
        }
    }
    fn percent(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.
        } else {
            count as f64 / total as f64 * 100.
        }
    }
    pub fn hit_rate(&self) -> f64 {
        Self::percent(self.hit_count, self.total_count)
    }
    pub fn ideal_hit_rate(&self) -> f64 {
        Self::percent(self.ideal_hit_count, self.total_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub total_address_bits: u64,
    pub offset_bits: u64,
    pub index_bits: u64,
    pub tag_bits: u64,
    pub num_cache_blocks: u64,
    pub num_sets: u64,
    pub num_memory_blocks: u64,
    /// data plus valid, dirty and tag bits, fractional bytes are kept
    pub total_footprint_bytes: f64,
}

/// the state of one slot at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub slot_number: u64,
    pub set_index: u64,
    pub offset: u64,
    pub valid: bool,
    pub dirty: bool,
    pub tag: Option<u64>,
    pub block_number: Option<u64>,
}

/// everything a run produces, ready for printing or saving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub params: CacheParameters,
    pub geometry: Geometry,
    pub steps: Vec<StepRecord>,
    pub summary: RunSummary,
    pub slots: Vec<SlotSnapshot>,
}

impl SimulationReport {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref()).wrap_err("cannot create report file")?;
        serde_json::to_writer_pretty(file, self).wrap_err("cannot write report")?;
        Ok(())
    }
}
