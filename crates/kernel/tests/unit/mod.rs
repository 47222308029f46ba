//! # Unit Components
//!
//! Tests for each kernel component in isolation, followed by whole-system scenarios
//! and randomized invariant checks.

/// Configuration defaults, JSON loading, and validation.
pub mod config;








/// File and in-memory trace loading.
pub mod trace;

/// Workload parsing, validation, and submission.
pub mod workload;
