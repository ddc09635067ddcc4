use std::collections::HashMap;

use crate::{
    cache::{decode, get_bit_lens, CacheSet, MemoryReference},
    config::CacheParameters,
    error::InputError,
    statistics::{
        Geometry, HitMiss, RunSummary, SequenceSummary, SimulationReport, SlotSnapshot,
        StepRecord,
    },
};

/// # CacheMemory
/// the cache in front of main memory.
/// - references are dispatched to the set their block maps to
/// - the parameters are validated again on construction, the fields are public
#[derive(Debug, Clone)]
pub struct CacheMemory {
    params: CacheParameters,
    sets: Vec<CacheSet>,
    total_address_bits: u64,
    offset_bits: u64,
    index_bits: u64,
    tag_bits: u64,
}

impl CacheMemory {
    pub fn new(params: &CacheParameters) -> Result<Self, InputError> {
        params.validate()?;
        let num_sets = params.num_sets();
        let sets = vec![
            CacheSet::new(params.associativity as usize, params.policy);
            num_sets as usize
        ];
        let memory = CacheMemory {
            params: params.clone(),
            sets,
            total_address_bits: get_bit_lens(params.memory_size),
            offset_bits: get_bit_lens(params.block_size),
            index_bits: get_bit_lens(num_sets),
            tag_bits: get_bit_lens(params.num_memory_blocks() / num_sets),
        };
        tracing::info!(
            sets = num_sets,
            associativity = params.associativity,
            policy = ?params.policy,
            offset_bits = memory.offset_bits,
            index_bits = memory.index_bits,
            tag_bits = memory.tag_bits,
            "cache built"
        );
        Ok(memory)
    }

    pub fn params(&self) -> &CacheParameters {
        &self.params
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    pub fn get_tag_bit_len(&self) -> u64 {
        self.tag_bits
    }

    /// the slot number counted over the whole cache
    pub fn slot_number(&self, set_index: u64, offset: u64) -> u64 {
        set_index * self.params.associativity + offset
    }

    /// run one reference through the cache
    pub fn simulate_step(&mut self, reference: &MemoryReference) -> StepRecord {
        let decoded = decode(reference.address, &self.params);
        let result = self.sets[decoded.set_index as usize].access(
            decoded.tag,
            decoded.memory_block_number,
            reference.operation,
        );
        tracing::debug!(
            address = reference.address,
            block = decoded.memory_block_number,
            set = decoded.set_index,
            ?result,
            "step"
        );
        StepRecord {
            reference: *reference,
            memory_block_number: decoded.memory_block_number,
            set_index: decoded.set_index,
            result: HitMiss::from(result),
            slot_number: self.slot_number(decoded.set_index, result.slot() as u64),
        }
    }

    /// run the references in order
    pub fn run_sequence(
        &mut self,
        references: &[MemoryReference],
    ) -> (Vec<StepRecord>, SequenceSummary) {
        let steps: Vec<_> = references
            .iter()
            .map(|reference| self.simulate_step(reference))
            .collect();
        let hit_count = steps
            .iter()
            .filter(|step| step.result == HitMiss::Hit)
            .count();
        let summary = SequenceSummary {
            hit_count,
            total_count: steps.len(),
        };
        (steps, summary)
    }

    /// the hits an unbounded, fully associative cache that never evicts would get:
    /// every reference to a block after its first one.
    ///
    /// this is an upper bound, no real replacement policy on this cache can beat it,
    /// and it is usually not reachable with the real size and associativity.
    pub fn compute_ideal_hit_count(&self, references: &[MemoryReference]) -> usize {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        for reference in references {
            *counts
                .entry(reference.address / self.params.block_size)
                .or_default() += 1;
        }
        counts.values().map(|&n| n.saturating_sub(1)).sum()
    }

    /// the size of the cache including the valid, dirty and tag bits of every block
    pub fn compute_overhead_bytes(&self) -> f64 {
        let per_block_overhead_bits = 2 + self.tag_bits;
        self.params.cache_size as f64
            + (self.params.num_cache_blocks() * per_block_overhead_bits) as f64 / 8.
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            total_address_bits: self.total_address_bits,
            offset_bits: self.offset_bits,
            index_bits: self.index_bits,
            tag_bits: self.tag_bits,
            num_cache_blocks: self.params.num_cache_blocks(),
            num_sets: self.params.num_sets(),
            num_memory_blocks: self.params.num_memory_blocks(),
            total_footprint_bytes: self.compute_overhead_bytes(),
        }
    }

    /// every slot of the cache, in global slot order
    pub fn slots(&self) -> Vec<SlotSnapshot> {
        self.sets
            .iter()
            .enumerate()
            .flat_map(|(set_index, set)| {
                set.blocks()
                    .iter()
                    .enumerate()
                    .map(move |(offset, block)| (set_index as u64, offset as u64, *block))
            })
            .map(|(set_index, offset, block)| SlotSnapshot {
                slot_number: self.slot_number(set_index, offset),
                set_index,
                offset,
                valid: block.valid,
                dirty: block.dirty,
                tag: block.tag,
                block_number: block.block_number,
            })
            .collect()
    }

    /// run the whole trace and collect everything needed for the report
    pub fn run(&mut self, references: &[MemoryReference]) -> SimulationReport {
        let (steps, sequence) = self.run_sequence(references);
        let summary = RunSummary::new(sequence, self.compute_ideal_hit_count(references));
        tracing::info!(
            hits = summary.hit_count,
            total = summary.total_count,
            ideal = summary.ideal_hit_count,
            "simulation finished"
        );
        SimulationReport {
            params: self.params.clone(),
            geometry: self.geometry(),
            steps,
            summary,
            slots: self.slots(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::ReplacementPolicy, test_utils};

    fn scenario_a() -> CacheMemory {
        let params = CacheParameters::new(16, 8, 2, 1, ReplacementPolicy::LRU).unwrap();
        CacheMemory::new(&params).unwrap()
    }

    #[test]
    fn test_geometry() {
        test_utils::init();
        let memory = scenario_a();
        let geometry = memory.geometry();
        assert_eq!(geometry.num_cache_blocks, 4);
        assert_eq!(geometry.num_sets, 4);
        assert_eq!(geometry.total_address_bits, 4);
        assert_eq!(geometry.offset_bits, 1);
        assert_eq!(geometry.index_bits, 2);
        assert_eq!(geometry.tag_bits, 1);
        // 8 bytes of data and 4 * 3 bits of overhead
        assert_eq!(geometry.total_footprint_bytes, 9.5);
        assert_eq!(
            geometry.offset_bits + geometry.index_bits + geometry.tag_bits,
            geometry.total_address_bits
        );
    }

    #[test]
    fn test_scenario_a() {
        test_utils::init();
        let mut memory = scenario_a();
        let refs = [
            MemoryReference::read(0),
            MemoryReference::read(2),
            MemoryReference::read(0),
        ];
        let (steps, summary) = memory.run_sequence(&refs);
        let blocks: Vec<_> = steps.iter().map(|s| s.memory_block_number).collect();
        let sets: Vec<_> = steps.iter().map(|s| s.set_index).collect();
        let results: Vec<_> = steps.iter().map(|s| s.result).collect();
        assert_eq!(blocks, vec![0, 1, 0]);
        assert_eq!(sets, vec![0, 1, 0]);
        assert_eq!(results, vec![HitMiss::Miss, HitMiss::Miss, HitMiss::Hit]);
        assert_eq!(summary.hit_count, 1);
        assert_eq!(summary.total_count, 3);
        assert_eq!(memory.compute_ideal_hit_count(&refs), 1);
    }

    #[test]
    fn test_conflict_misses() {
        // blocks 0 and 4 both map to set 0 of a direct mapped cache
        let mut memory = scenario_a();
        let refs = [
            MemoryReference::read(0),
            MemoryReference::read(8),
            MemoryReference::read(0),
            MemoryReference::read(8),
        ];
        let report = memory.run(&refs);
        assert_eq!(report.summary.hit_count, 0);
        assert_eq!(report.summary.ideal_hit_count, 2);
        assert!(report.summary.ideal_hit_count >= report.summary.hit_count);
    }

    #[test]
    fn test_ideal_hit_count() {
        let memory = scenario_a();
        assert_eq!(memory.compute_ideal_hit_count(&[]), 0);
        // 0 and 1 are in the same block
        let refs = [
            MemoryReference::read(0),
            MemoryReference::write(1),
            MemoryReference::read(0),
            MemoryReference::read(15),
        ];
        assert_eq!(memory.compute_ideal_hit_count(&refs), 2);
    }

    #[test]
    fn test_slots_and_dirty() {
        let params = CacheParameters::new(64, 16, 4, 2, ReplacementPolicy::FIFO).unwrap();
        let mut memory = CacheMemory::new(&params).unwrap();
        // 2 sets, block 3 -> set 1, block 4 -> set 0
        let report = memory.run(&[MemoryReference::write(12), MemoryReference::read(16)]);
        assert_eq!(report.steps[0].slot_number, 2);
        assert_eq!(report.steps[1].slot_number, 0);
        let slots = report.slots;
        assert_eq!(slots.len(), 4);
        assert!(slots[0].valid && !slots[0].dirty);
        assert_eq!(slots[0].block_number, Some(4));
        assert_eq!(slots[0].tag, Some(2));
        assert!(!slots[1].valid);
        assert!(slots[2].valid && slots[2].dirty);
        assert_eq!(slots[2].block_number, Some(3));
        assert_eq!(slots[2].tag, Some(1));
        assert_eq!(slots[3].slot_number, 3);
        assert_eq!(slots[3].set_index, 1);
        assert_eq!(slots[3].offset, 1);
    }

    #[test]
    fn test_fractional_footprint() {
        // 1 block of 2 bytes, tag has 3 bits, so 5 bits of overhead
        let params = CacheParameters::new(16, 2, 2, 1, ReplacementPolicy::LRU).unwrap();
        let memory = CacheMemory::new(&params).unwrap();
        assert_eq!(memory.get_tag_bit_len(), 3);
        assert_eq!(memory.compute_overhead_bytes(), 2.625);
    }

    #[test]
    fn test_reject_unvalidated_params() {
        for associativity in [0, 3] {
            let params = CacheParameters {
                memory_size: 16,
                cache_size: 8,
                block_size: 2,
                associativity,
                policy: ReplacementPolicy::LRU,
            };
            let err = CacheMemory::new(&params).unwrap_err();
            assert!(matches!(
                err,
                InputError::Configuration {
                    field: "associativity",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_sequence_then_ideal() {
        let mut memory = scenario_a();
        let refs = [MemoryReference::read(0), MemoryReference::read(0)];
        let (_, sequence) = memory.run_sequence(&refs);
        assert_eq!(
            sequence,
            SequenceSummary {
                hit_count: 1,
                total_count: 2
            }
        );
        let summary = RunSummary::new(sequence, memory.compute_ideal_hit_count(&refs));
        assert_eq!(summary.ideal_hit_count, 1);
    }

    #[test]
    fn test_deterministic() {
        let params = CacheParameters::new(256, 32, 4, 2, ReplacementPolicy::LRU).unwrap();
        let refs: Vec<_> = (0..200u64)
            .map(|i| {
                let address = (i * 37 + i / 3) % 256;
                if i % 5 == 0 {
                    MemoryReference::write(address)
                } else {
                    MemoryReference::read(address)
                }
            })
            .collect();
        let first = CacheMemory::new(&params).unwrap().run(&refs);
        let second = CacheMemory::new(&params).unwrap().run(&refs);
        assert_eq!(first.steps, second.steps);
        assert_eq!(first.slots, second.slots);
        assert!(first.summary.ideal_hit_count >= first.summary.hit_count);
    }
}
