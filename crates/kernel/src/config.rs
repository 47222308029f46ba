//! Configuration system for the kernel simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline scheduling, paging, and reporting constants.
//! 2. **Structures:** Hierarchical config for general, scheduler, and memory settings.
//! 3. **Loading:** JSON parsing with range validation.
//!
//! A `Config` is fixed for the whole run and handed by reference to each component at
//! construction; nothing reads configuration from ambient state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, Cycle};

/// Default configuration constants for the simulator.
mod defaults {
    /// Cycles of CPU time a process receives before forced preemption.
    pub const QUANTUM: u64 = 200;

    /// Idle gap, in cycles, between a process terminating and the next dispatch.
    pub const CONTEXT_SWITCH_OVERHEAD: u64 = 1;

    /// Number of physical page frames.
    pub const PAGE_FRAMES: usize = 100;

    /// Cycles the disk needs to swap one page in.
    pub const SWAP_LATENCY: u64 = 1000;

    /// Simulated clock rate used when reporting simulated seconds.
    pub const CYCLES_PER_SECOND: u64 = 100_000;
}

/// Root configuration structure.
///
/// Every section may be omitted from JSON, in which case its defaults apply.
///
/// # Example
///
/// ```
/// use kernsim_core::config::Config;
///
/// let json = r#"{ "scheduler": { "quantum": 5 }, "memory": { "page_frames": 4 } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.scheduler.quantum, 5);
/// assert_eq!(config.memory.swap_latency, 1000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Run-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Round-robin scheduling parameters.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Demand paging parameters.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and [`ConfigError::Invalid`]
    /// when a parameter is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the errors of
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that every parameter is a positive integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: u64, field: &'static str| {
            if value == 0 {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                })
            } else {
                Ok(())
            }
        };

        positive(self.scheduler.quantum, "scheduler.quantum")?;
        positive(
            self.scheduler.context_switch_overhead,
            "scheduler.context_switch_overhead",
        )?;
        positive(self.memory.page_frames as u64, "memory.page_frames")?;
        positive(self.memory.swap_latency, "memory.swap_latency")?;
        positive(self.general.cycles_per_second, "general.cycles_per_second")?;
        if let Some(limit) = self.general.max_cycles {
            positive(limit, "general.max_cycles")?;
        }
        Ok(())
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Abort the run with an error after this many cycles (unbounded when absent).
    #[serde(default)]
    pub max_cycles: Option<Cycle>,

    /// Simulated clock rate, only used to express cycle counts as simulated seconds.
    #[serde(default = "GeneralConfig::default_cycles_per_second")]
    pub cycles_per_second: u64,
}

impl GeneralConfig {
    /// Returns the default simulated clock rate.
    const fn default_cycles_per_second() -> u64 {
        defaults::CYCLES_PER_SECOND
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: None,
            cycles_per_second: defaults::CYCLES_PER_SECOND,
        }
    }
}

/// Round-robin scheduler parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum contiguous cycles a process may run before forced preemption.
    #[serde(default = "SchedulerConfig::default_quantum")]
    pub quantum: u64,

    /// Cycles from a termination to the earliest start of the next process.
    #[serde(default = "SchedulerConfig::default_context_switch_overhead")]
    pub context_switch_overhead: u64,
}

impl SchedulerConfig {
    /// Returns the default quantum length.
    const fn default_quantum() -> u64 {
        defaults::QUANTUM
    }

    /// Returns the default context-switch overhead.
    const fn default_context_switch_overhead() -> u64 {
        defaults::CONTEXT_SWITCH_OVERHEAD
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum: defaults::QUANTUM,
            context_switch_overhead: defaults::CONTEXT_SWITCH_OVERHEAD,
        }
    }
}

/// Demand paging parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Number of physical page frames.
    #[serde(default = "MemoryConfig::default_page_frames")]
    pub page_frames: usize,

    /// Cycles the disk needs to complete one swap-in. Transfers are serialized.
    #[serde(default = "MemoryConfig::default_swap_latency")]
    pub swap_latency: u64,
}

impl MemoryConfig {
    /// Returns the default page frame count.
    const fn default_page_frames() -> usize {
        defaults::PAGE_FRAMES
    }

    /// Returns the default swap latency.
    const fn default_swap_latency() -> u64 {
        defaults::SWAP_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_frames: defaults::PAGE_FRAMES,
            swap_latency: defaults::SWAP_LATENCY,
        }
    }
}
