use eyre::{Result, WrapErr};
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// the policy used to choose the victim slot when a set is full
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    /// evict the slot that was referenced least recently
    #[serde(alias = "L", alias = "l", alias = "lru")]
    LRU,
    /// evict the slot that was installed earliest
    #[serde(alias = "F", alias = "f", alias = "fifo")]
    FIFO,
}

/// the geometry and policy of the simulated memory system
///
/// all sizes are in bytes and must be powers of two
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CacheParameters {
    pub memory_size: u64,
    pub cache_size: u64,
    pub block_size: u64,
    /// 1 means direct mapped
    pub associativity: u64,
    pub policy: ReplacementPolicy,
}

fn check_field(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), InputError> {
    if !value.is_power_of_two() {
        return Err(InputError::Configuration {
            field,
            value,
            reason: "must be a power of two".to_string(),
        });
    }
    if value < min || value > max {
        return Err(InputError::Configuration {
            field,
            value,
            reason: format!("must be between {min} and {max}"),
        });
    }
    Ok(())
}

impl CacheParameters {
    pub fn new(
        memory_size: u64,
        cache_size: u64,
        block_size: u64,
        associativity: u64,
        policy: ReplacementPolicy,
    ) -> Result<Self, InputError> {
        let params = CacheParameters {
            memory_size,
            cache_size,
            block_size,
            associativity,
            policy,
        };
        params.validate()?;
        Ok(params)
    }

    /// check the fields in the order they depend on each other,
    /// the first broken field is reported
    pub fn validate(&self) -> Result<(), InputError> {
        check_field("memory_size", self.memory_size, 4, u64::MAX)?;
        check_field("cache_size", self.cache_size, 2, self.memory_size)?;
        check_field("block_size", self.block_size, 2, self.cache_size)?;
        check_field(
            "associativity",
            self.associativity,
            1,
            self.cache_size / self.block_size,
        )?;
        Ok(())
    }

    pub fn from_config_file(config_file: impl AsRef<Path>) -> Result<CacheParameters> {
        let config_file =
            fs::read_to_string(config_file.as_ref()).wrap_err("cannot read config file")?;
        let params: CacheParameters =
            toml::from_str(&config_file).wrap_err("cannot deserialize to CacheParameters")?;
        params.validate()?;
        Ok(params)
    }

    pub fn num_cache_blocks(&self) -> u64 {
        self.cache_size / self.block_size
    }
    pub fn num_sets(&self) -> u64 {
        self.num_cache_blocks() / self.associativity
    }
    pub fn num_memory_blocks(&self) -> u64 {
        self.memory_size / self.block_size
    }
}
