//! Simulator: wires the concrete kernel components together.
//!
//! The execution unit owns the round-robin scheduler and the FIFO memory; the
//! simulator adds the configuration they were built from and produces a report.

use tracing::warn;

use super::trace::TraceLoader;
use super::workload::Workload;
use crate::common::SimError;
use crate::config::Config;
use crate::core::cpu::ExecutionUnit;
use crate::core::mmu::FifoMemory;
use crate::core::sched::RoundRobinScheduler;
use crate::stats::SimReport;

/// Execution unit over the concrete scheduler and memory manager.
pub type KernelUnit<L> = ExecutionUnit<RoundRobinScheduler, FifoMemory, L>;

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator<L> {
    config: Config,
    unit: KernelUnit<L>,
}

impl<L: TraceLoader> Simulator<L> {
    /// Creates a simulator for `config` reading traces through `loader`.
    pub fn new(config: &Config, loader: L) -> Self {
        if config.scheduler.quantum == 1 {
            warn!(
                "a quantum of 1 defers every fault raised while another process is ready; \
                 processes that miss on their first reference can livelock"
            );
        }
        let scheduler = RoundRobinScheduler::new(&config.scheduler);
        let memory = FifoMemory::new(&config.memory);
        Self {
            config: config.clone(),
            unit: ExecutionUnit::new(scheduler, memory, loader),
        }
    }

    /// Schedules the arrivals of `workload`.
    pub fn submit(&mut self, workload: &Workload) {
        if self.config.memory.page_frames < workload.len() {
            warn!(
                frames = self.config.memory.page_frames,
                processes = workload.len(),
                "fewer page frames than processes; eviction may find every frame busy"
            );
        }
        workload.submit(self.unit.scheduler_mut());
    }

    /// Runs until every submitted process has finished.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if a trace fails, or
    /// [`SimError::CycleLimitExceeded`] if `general.max_cycles` is reached first.
    pub fn run(&mut self) -> Result<SimReport, SimError> {
        self.unit.run(self.config.general.max_cycles)?;
        Ok(self.report())
    }

    /// Counters accumulated so far.
    pub fn report(&self) -> SimReport {
        SimReport {
            sim: self.unit.stats(),
            scheduler: self.unit.scheduler().stats(),
            memory: self.unit.memory().stats(),
            cycles_per_second: self.config.general.cycles_per_second,
        }
    }

    /// The configuration this simulator was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The execution unit, for inspection.
    pub const fn unit(&self) -> &KernelUnit<L> {
        &self.unit
    }

    /// The execution unit, for single-stepping.
    pub const fn unit_mut(&mut self) -> &mut KernelUnit<L> {
        &mut self.unit
    }
}
