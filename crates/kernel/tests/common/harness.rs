use kernsim_core::common::{Cycle, ProcessId, TraceError};
use kernsim_core::config::{Config, SchedulerConfig};
use kernsim_core::core::mmu::MemoryManager;
use kernsim_core::core::sched::{RoundRobinScheduler, Scheduler};
use kernsim_core::core::{CpuState, ExecutionUnit};
use kernsim_core::sim::MemoryTraceLoader;
use tracing_subscriber::EnvFilter;

/// Cycle budget after which a harness run is considered hung.
pub const HANG_LIMIT: Cycle = 1_000_000;

/// Routes `tracing` output through the test writer; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration with the given scheduling and paging parameters.
pub fn config(quantum: u64, page_frames: usize, swap_latency: u64) -> Config {
    let mut config = Config::default();
    config.scheduler.quantum = quantum;
    config.memory.page_frames = page_frames;
    config.memory.swap_latency = swap_latency;
    config
}

/// Execution unit over the real scheduler, a chosen memory manager, and in-memory traces.
pub struct TestContext<M> {
    pub unit: ExecutionUnit<RoundRobinScheduler, M, MemoryTraceLoader>,
}

impl<M: MemoryManager> TestContext<M> {
    /// Creates a context with the given quantum and a switch overhead of one cycle.
    pub fn new(quantum: u64, memory: M, traces: MemoryTraceLoader) -> Self {
        Self::with_overhead(quantum, 1, memory, traces)
    }

    /// Creates a context with the given quantum and termination switch overhead.
    pub fn with_overhead(
        quantum: u64,
        context_switch_overhead: u64,
        memory: M,
        traces: MemoryTraceLoader,
    ) -> Self {
        init_tracing();
        let scheduler = RoundRobinScheduler::new(&SchedulerConfig {
            quantum,
            context_switch_overhead,
        });
        Self {
            unit: ExecutionUnit::new(scheduler, memory, traces),
        }
    }

    /// Schedules the arrival of `name` at `time`.
    #[must_use]
    pub fn arrive(mut self, name: &str, time: Cycle) -> Self {
        self.unit
            .scheduler_mut()
            .notify_process_created(time, ProcessId::new(name));
        self
    }

    /// Steps one cycle and checks the scheduler invariants afterwards.
    pub fn step(&mut self) -> Result<bool, TraceError> {
        let more = self.unit.step()?;
        let current = self.unit.state().runnable();
        self.unit.scheduler().assert_invariants(current.process());
        Ok(more)
    }

    /// Steps until the clock reads `time`; the simulation must not end earlier.
    pub fn step_to(&mut self, time: Cycle) {
        while self.unit.time() < time {
            let more = self.step().expect("trace error while stepping");
            assert!(more, "simulation ended at cycle {}", self.unit.time());
        }
    }

    /// Steps until the simulation ends and returns the final clock value.
    pub fn finish(&mut self) -> Cycle {
        while self.step().expect("trace error while running") {
            assert!(self.unit.time() < HANG_LIMIT, "simulation did not finish");
        }
        self.unit.time()
    }

    /// Name of the current process, or `None` when idle.
    pub fn running(&self) -> Option<&str> {
        match self.unit.state() {
            CpuState::Idle => None,
            CpuState::Running { process, .. } => Some(process.as_str()),
        }
    }

    /// The switch timeline as `(decided at, next, start)` with `next` rendered as text.
    pub fn switches(&self) -> Vec<(Cycle, String, Cycle)> {
        self.unit
            .timeline()
            .iter()
            .map(|record| (record.at, record.next.to_string(), record.start))
            .collect()
    }
}

/// Builds an expected timeline row.
pub fn switch(at: Cycle, next: &str, start: Cycle) -> (Cycle, String, Cycle) {
    (at, next.to_owned(), start)
}
