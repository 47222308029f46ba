//! Kernel core.
//!
//! The three coupled components of the simulated kernel:
//! 1. **CPU:** The execution unit that owns the clock and steps process traces.
//! 2. **Scheduler:** Pending events, run queues, and round-robin policy.
//! 3. **MMU:** Page residency, FIFO replacement, and swap-latency modeling.

/// Execution unit, CPU state, and the context-switch receiver.
pub mod cpu;

/// Memory manager contract and FIFO implementation.
pub mod mmu;

/// Scheduler contract, event table, and round-robin implementation.
pub mod sched;

pub use cpu::{CpuState, ExecutionUnit};
