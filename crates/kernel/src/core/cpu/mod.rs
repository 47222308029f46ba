//! Execution Unit Definition and Initialization.
//!
//! This module defines the `ExecutionUnit`, which owns the simulated clock and drives
//! the other components. It coordinates the following:
//! 1. **State Management:** Tracks whether the CPU is idle or running a process, and
//!    from which cycle that process may execute.
//! 2. **Trace Stepping:** Holds each process's trace and its pending unconsumed token.
//! 3. **Component Wiring:** Owns the scheduler and memory manager and lends them to
//!    each other per call.

/// Per-cycle stepping and the run loop.
pub mod execution;

use std::collections::HashMap;

use crate::common::{Cycle, PageId, ProcessId, Runnable};
use crate::core::sched::ContextSwitch;
use crate::sim::trace::{TraceLoader, TraceSource};
use crate::stats::{SimStats, SwitchRecord};

/// What the CPU is doing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CpuState {
    /// The idle pseudo-process is current.
    #[default]
    Idle,
    /// `process` is current and may execute from cycle `resume_at` onward.
    Running {
        /// Current process.
        process: ProcessId,
        /// First cycle at which the process executes; later cycles model switch cost.
        resume_at: Cycle,
    },
}

impl CpuState {
    /// Returns `true` when the idle pseudo-process is current.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The current runnable, as the scheduler sees it.
    pub fn runnable(&self) -> Runnable {
        match self {
            Self::Idle => Runnable::Idle,
            Self::Running { process, .. } => Runnable::Process(process.clone()),
        }
    }
}

/// CPU-side receiver of context switches.
///
/// Kept apart from the rest of the execution unit so it can be lent to the scheduler
/// while the unit's other fields stay borrowed.
#[derive(Debug, Default)]
pub struct Dispatch {
    state: CpuState,
    now: Cycle,
    timeline: Vec<SwitchRecord>,
}

impl Dispatch {
    /// Current CPU state.
    pub const fn state(&self) -> &CpuState {
        &self.state
    }

    /// Every switch received so far, in order.
    pub fn timeline(&self) -> &[SwitchRecord] {
        &self.timeline
    }
}

impl ContextSwitch for Dispatch {
    fn context_switch(&mut self, next: Runnable, start_at: Cycle) {
        self.timeline.push(SwitchRecord {
            at: self.now,
            next: next.clone(),
            start: start_at,
        });
        self.state = match next {
            Runnable::Idle => CpuState::Idle,
            Runnable::Process(process) => CpuState::Running {
                process,
                resume_at: start_at,
            },
        };
    }
}

/// A process's trace and the token it has read but not yet had serviced.
#[derive(Debug)]
struct ProcessTrace {
    source: Box<dyn TraceSource>,
    pending: Option<PageId>,
    exhausted: bool,
}

/// Drives the simulated clock one cycle at a time.
///
/// Generic over the scheduler, memory manager, and trace loader so that each can be
/// replaced by a fake in tests.
#[derive(Debug)]
pub struct ExecutionUnit<S, M, L> {
    scheduler: S,
    memory: M,
    loader: L,
    dispatch: Dispatch,
    traces: HashMap<ProcessId, ProcessTrace>,
    time: Cycle,
    stats: SimStats,
}

impl<S, M, L> ExecutionUnit<S, M, L>
where
    L: TraceLoader,
{
    /// Creates an idle execution unit at cycle 0.
    pub fn new(scheduler: S, memory: M, loader: L) -> Self {
        Self {
            scheduler,
            memory,
            loader,
            dispatch: Dispatch::default(),
            traces: HashMap::new(),
            time: 0,
            stats: SimStats::default(),
        }
    }

    /// Last cycle stepped.
    pub const fn time(&self) -> Cycle {
        self.time
    }

    /// Current CPU state.
    pub const fn state(&self) -> &CpuState {
        &self.dispatch.state
    }

    /// Context switches received so far, in order.
    pub fn timeline(&self) -> &[SwitchRecord] {
        self.dispatch.timeline()
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.context_switches = self.dispatch.timeline.len() as u64;
        stats
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The scheduler, mutably; the arrival feed submits processes through it.
    pub const fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The memory manager.
    pub const fn memory(&self) -> &M {
        &self.memory
    }

    /// Token read by `process` but not yet serviced, if any.
    pub fn pending_token(&self, process: &ProcessId) -> Option<&PageId> {
        self.traces
            .get(process)
            .and_then(|trace| trace.pending.as_ref())
    }
}
