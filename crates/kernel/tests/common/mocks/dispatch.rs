use kernsim_core::common::{Cycle, Runnable};
use kernsim_core::core::sched::{ContextSwitch, Scheduler};

/// Context-switch sink that records every decision and tracks the current runnable.
#[derive(Debug, Default)]
pub struct RecordingSwitch {
    /// Runnable most recently switched to.
    pub current: Runnable,
    /// Every switch as `(next, start_at)`, in order.
    pub switches: Vec<(Runnable, Cycle)>,
}

impl RecordingSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks `scheduler` at `time` with the recorded current runnable.
    pub fn tick(&mut self, scheduler: &mut dyn Scheduler, time: Cycle) -> bool {
        let current = self.current.clone();
        scheduler.tick(time, &current, self)
    }

    /// Name of the current process, or `None` when idle.
    pub fn running(&self) -> Option<&str> {
        self.current.process().map(|pid| pid.as_str())
    }

    /// The most recent switch.
    pub fn last(&self) -> Option<&(Runnable, Cycle)> {
        self.switches.last()
    }
}

impl ContextSwitch for RecordingSwitch {
    fn context_switch(&mut self, next: Runnable, start_at: Cycle) {
        self.current = next.clone();
        self.switches.push((next, start_at));
    }
}

/// Shorthand for a process runnable.
pub fn proc(name: &str) -> Runnable {
    Runnable::Process(name.into())
}
