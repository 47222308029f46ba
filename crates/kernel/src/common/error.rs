//! Recoverable error definitions.
//!
//! This module defines the errors surfaced to callers of the simulator. It provides:
//! 1. **Configuration errors:** Unreadable, malformed, or out-of-range parameters.
//! 2. **Workload errors:** Arrival feeds that would violate the event-table keying.
//! 3. **Trace errors:** I/O failures while reading a process's reference trace.
//! 4. **Simulation errors:** The top-level type returned by a run.
//!
//! Broken model invariants (double-scheduled events, eviction with every frame busy,
//! a process queued twice) are not represented here: they are programmer errors and
//! panic at the point of detection.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ids::{Cycle, ProcessId};

/// Errors produced while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration '{}': {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for the config schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter is outside its permitted range.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Dotted path of the offending field, e.g. `scheduler.quantum`.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}

/// Errors produced while loading or validating a [`Workload`](crate::sim::Workload).
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The workload file could not be read.
    #[error("cannot read workload '{}': {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The workload text is not valid JSON for the workload schema.
    #[error("malformed workload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The workload lists no processes.
    #[error("workload contains no processes")]
    Empty,

    /// Two processes share a name.
    #[error("process '{0}' is listed more than once")]
    DuplicateProcess(ProcessId),

    /// A process name cannot be used as a trace file stem.
    #[error("process name '{0}' must be non-empty and must not contain path separators or whitespace")]
    InvalidName(String),

    /// Two processes arrive on the same cycle.
    ///
    /// Pending events are keyed by `(time, kind)`, so one cycle carries at most one arrival.
    #[error("processes '{first}' and '{second}' both arrive at cycle {time}")]
    ArrivalCollision {
        /// Shared arrival cycle.
        time: Cycle,
        /// Process listed first.
        first: ProcessId,
        /// Process listed second.
        second: ProcessId,
    },
}

/// Errors produced while opening or reading a process's reference trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace for a process could not be opened.
    #[error("cannot open trace for process '{process}' at '{}': {source}", path.display())]
    Open {
        /// Process whose trace was requested.
        process: ProcessId,
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading the next token failed.
    #[error("cannot read trace for process '{process}': {source}")]
    Read {
        /// Process whose trace was being read.
        process: ProcessId,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// No trace is registered for the process.
    #[error("no trace registered for process '{0}'")]
    Missing(ProcessId),
}

/// Top-level error returned by a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workload was rejected.
    #[error(transparent)]
    Workload(#[from] WorkloadError),

    /// A reference trace failed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The run reached `general.max_cycles` before every process finished.
    #[error("simulation did not finish within {limit} cycles")]
    CycleLimitExceeded {
        /// Configured cycle limit.
        limit: Cycle,
    },
}
