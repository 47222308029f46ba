//! Scheduler.
//!
//! This module defines the scheduling contract between the execution unit and the
//! kernel. It provides:
//! 1. **Events:** The pending-event table keyed by `(time, kind)`.
//! 2. **Contracts:** The `Scheduler` trait and the CPU-facing `ContextSwitch` sink.
//! 3. **Policy:** Preemptive round-robin with fault-recovered processes served first.
//!
//! Collaborators are passed per call (`&mut dyn ContextSwitch`, `&mut dyn MemoryManager`)
//! so the scheduler never owns the CPU or the memory manager and no component holds a
//! reference back to another.

/// Pending event table.
pub mod events;

/// Round-robin scheduling policy.
pub mod round_robin;

pub use events::{Event, EventKey, EventKind, EventTable};
pub use round_robin::{ProcessControl, RoundRobinScheduler, SchedulerStats};

use crate::common::{Cycle, PageId, ProcessId, Runnable};
use crate::core::mmu::MemoryManager;

/// Receives dispatch decisions from the scheduler.
pub trait ContextSwitch {
    /// Makes `next` the current runnable; it may execute from cycle `start_at` onward.
    fn context_switch(&mut self, next: Runnable, start_at: Cycle);
}

/// Event dispatch and run-queue management.
pub trait Scheduler {
    /// Schedules the arrival of `process` at `time`.
    fn notify_process_created(&mut self, time: Cycle, process: ProcessId);

    /// Schedules the completion of the swap-in of `page` at `time`.
    fn notify_disk_completion(&mut self, time: Cycle, page: PageId);

    /// Resolves everything due at `time` and possibly switches the CPU.
    ///
    /// Arrivals are handled first, then disk completions, then a timer due now (or an
    /// idle CPU) triggers a scheduling decision. Returns `false` once no event is
    /// pending and no process is waiting in any queue.
    fn tick(&mut self, time: Cycle, current: &Runnable, cpu: &mut dyn ContextSwitch) -> bool;

    /// Retires `process`, whose trace is exhausted, and idles the CPU.
    fn notify_process_termination(
        &mut self,
        time: Cycle,
        process: &ProcessId,
        cpu: &mut dyn ContextSwitch,
    );

    /// Handles a miss by `process` on `page`, detected to take effect at `time`.
    fn notify_page_fault(
        &mut self,
        time: Cycle,
        process: &ProcessId,
        page: &PageId,
        memory: &mut dyn MemoryManager,
        cpu: &mut dyn ContextSwitch,
    );
}
