//! a simulator for a two-level memory hierarchy with a set associative cache
pub mod cache;
pub mod config;
pub mod error;
pub mod report;
pub mod simulator;
pub mod statistics;
pub(self) mod test_utils;
pub mod trace;

pub use cache::{AccessResult, MemoryReference, Operation};
pub use config::{CacheParameters, ReplacementPolicy};
pub use error::InputError;
pub use simulator::CacheMemory;
pub use statistics::SimulationReport;
