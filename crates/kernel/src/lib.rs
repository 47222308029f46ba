//! Single-CPU kernel simulator library.
//!
//! This crate steps a simulated kernel one cycle at a time:
//! 1. **Scheduler:** Preemptive round-robin over ready, fault-recovered, and blocked queues,
//!    driven by timer, disk-completion, and process-arrival events.
//! 2. **Memory:** Demand paging with FIFO replacement and a serialized swap disk.
//! 3. **Execution:** A CPU that walks each process's reference trace and reports faults.
//! 4. **Simulation:** Workload and trace loading, configuration, and statistics.
//!
//! The simulation is single-threaded and fully deterministic.

/// Common types (identifiers, cycles, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Kernel core (execution unit, scheduler, memory manager).
pub mod core;
/// Workloads, trace loading, and component wiring.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Top-level simulator wiring the concrete components together.
pub use crate::sim::Simulator;
