//! Main Execution Loop.
//!
//! Each cycle the execution unit:
//! 1. advances the clock and lets the scheduler resolve what is due;
//! 2. stops if the scheduler has nothing left and the CPU is idle;
//! 3. otherwise, if a process is current and past its start cycle, presents its next
//!    reference to the memory manager.
//!
//! A reference that misses stays pending in the process's trace slot and is presented
//! again the next time the process executes. The fault is reported for the following
//! cycle, which models the latency of detecting it.

use std::collections::hash_map::Entry;

use tracing::{debug, info, trace};

use super::{CpuState, ExecutionUnit, ProcessTrace};
use crate::common::{Cycle, SimError, TraceError};
use crate::core::mmu::MemoryManager;
use crate::core::sched::Scheduler;
use crate::sim::trace::TraceLoader;

impl<S, M, L> ExecutionUnit<S, M, L>
where
    S: Scheduler,
    M: MemoryManager,
    L: TraceLoader,
{
    /// Steps one cycle.
    ///
    /// Returns `Ok(false)` once the scheduler reports nothing pending while the CPU is
    /// idle; the clock still advanced to the cycle on which that was observed.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if the current process's trace cannot be opened or read.
    ///
    /// # Panics
    ///
    /// Panics if a process is dispatched again after its trace ended.
    pub fn step(&mut self) -> Result<bool, TraceError> {
        self.time += 1;
        let time = self.time;
        self.dispatch.now = time;

        let current = self.dispatch.state.runnable();
        let more = self.scheduler.tick(time, &current, &mut self.dispatch);
        if !more && self.dispatch.state.is_idle() {
            return Ok(false);
        }
        self.stats.cycles += 1;

        let process = match &self.dispatch.state {
            CpuState::Idle => {
                self.stats.idle_cycles += 1;
                return Ok(true);
            }
            CpuState::Running { resume_at, .. } if *resume_at > time => {
                self.stats.switch_cycles += 1;
                return Ok(true);
            }
            CpuState::Running { process, .. } => process.clone(),
        };
        self.stats.busy_cycles += 1;

        let slot = match self.traces.entry(process.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(%process, "opening trace");
                entry.insert(ProcessTrace {
                    source: self.loader.open(&process)?,
                    pending: None,
                    exhausted: false,
                })
            }
        };
        assert!(
            !slot.exhausted,
            "process {process} dispatched after its trace ended"
        );

        let token = match slot.pending.take() {
            Some(token) => Some(token),
            None => slot.source.next_token()?,
        };

        let Some(page) = token else {
            slot.exhausted = true;
            self.stats.processes_completed += 1;
            self.scheduler
                .notify_process_termination(time, &process, &mut self.dispatch);
            return Ok(true);
        };

        if self.memory.is_resident(time, &process, &page) {
            self.stats.references += 1;
            trace!(%process, %page, time, "reference serviced");
        } else {
            self.stats.page_faults += 1;
            trace!(%process, %page, time, "reference missed");
            self.scheduler.notify_page_fault(
                time + 1,
                &process,
                &page,
                &mut self.memory,
                &mut self.dispatch,
            );
            slot.pending = Some(page);
        }
        Ok(true)
    }

    /// Steps until the simulation ends.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if a trace fails, or
    /// [`SimError::CycleLimitExceeded`] if `max_cycles` is reached first.
    pub fn run(&mut self, max_cycles: Option<Cycle>) -> Result<(), SimError> {
        info!(start = self.time, "simulation started");
        while self.step()? {
            if let Some(limit) = max_cycles.filter(|&limit| self.time >= limit) {
                return Err(SimError::CycleLimitExceeded { limit });
            }
        }
        info!(
            cycles = self.stats.cycles,
            completed = self.stats.processes_completed,
            "simulation finished"
        );
        Ok(())
    }
}
