//! Identifier and time types shared by every component.
//!
//! This module provides the strong types the scheduler, execution unit, and memory
//! manager exchange. It defines:
//! 1. **Simulated time:** `Cycle`, the monotonically increasing cycle counter.
//! 2. **Processes:** `ProcessId`, keyed by process name.
//! 3. **Pages:** `PageId`, the text of a trace token.
//! 4. **Dispatch target:** `Runnable`, either a real process or the idle pseudo-process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulated time, in cycles. The first executed cycle is 1.
pub type Cycle = u64;

/// Identifier of a simulated process.
///
/// Process identity is its name; the file trace loader also uses it as the file stem.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    /// Creates a process identifier from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the process name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of a virtual page.
///
/// A page is named by the exact text of the trace token that references it; two
/// tokens with the same text refer to the same page regardless of which process
/// issued them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Creates a page identifier from its token text.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// What the CPU is dispatched to: a real process or the idle pseudo-process.
///
/// Idle is scheduled like a process so that the tick logic treats "nobody running"
/// uniformly with "someone running".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Runnable {
    /// No real process holds the CPU.
    #[default]
    Idle,
    /// The named process holds the CPU.
    Process(ProcessId),
}

impl Runnable {
    /// Returns `true` for the idle pseudo-process.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns the process identifier, or `None` when idle.
    pub const fn process(&self) -> Option<&ProcessId> {
        match self {
            Self::Idle => None,
            Self::Process(pid) => Some(pid),
        }
    }
}

impl From<ProcessId> for Runnable {
    fn from(pid: ProcessId) -> Self {
        Self::Process(pid)
    }
}

impl fmt::Display for Runnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("<idle>"),
            Self::Process(pid) => write!(f, "{pid}"),
        }
    }
}
