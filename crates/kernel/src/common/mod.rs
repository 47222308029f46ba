//! Common types used throughout the kernel simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Identifiers:** Strong types for processes, pages, and the idle pseudo-process.
//! 2. **Time:** The simulated `Cycle` counter type.
//! 3. **Error Handling:** Recoverable errors for configuration, workloads, and traces.

/// Error types for configuration, workload, trace, and run failures.
pub mod error;

/// Process, page, and cycle identifiers.
pub mod ids;

pub use error::{ConfigError, SimError, TraceError, WorkloadError};
pub use ids::{Cycle, PageId, ProcessId, Runnable};
