//! Simulation driver.
//!
//! Everything outside the kernel core that a complete run needs: reference traces,
//! the process arrival feed, and wiring of the concrete components.

/// Process arrival feed.
pub mod workload;

/// Wiring of the concrete scheduler, memory manager, and execution unit.
pub mod simulator;

/// Reference trace sources and loaders.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{FileTraceLoader, MemoryTraceLoader, TraceLoader, TraceSource};
pub use workload::{ProcessSpec, Workload};
