//! Preemptive round-robin scheduling.
//!
//! Processes wait in one of three FIFO queues:
//!
//! - `ready`: newly arrived or preempted processes.
//! - `fault_recovered`: processes whose awaited page just became resident. Served
//!   before `ready` so a fault costs as little extra latency as possible.
//! - `blocked`: processes waiting on a swap-in, each paired with its page.
//!
//! A timer preempted process re-enters `ready` with a full quantum. A process that
//! blocked on a fault keeps whatever quantum it had left and resumes with exactly that.
//!
//! A termination holds the CPU for the configured switch overhead: the next process
//! may be chosen on any later cycle, but it does not start, and its timer does not
//! run, until the overhead has elapsed.
//!
//! A fault that lands on the very cycle the faulting process's quantum expires is
//! deferred when another process is runnable: the timer path preempts it as usual and
//! the same reference faults again on its next turn. Blocking it instead would hand
//! it a fresh quantum on recovery while its peers wait.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use super::events::{Event, EventKind, EventTable};
use super::{ContextSwitch, Scheduler};
use crate::common::{Cycle, PageId, ProcessId, Runnable};
use crate::config::SchedulerConfig;
use crate::core::mmu::{MemoryManager, SwapOutcome};

/// Per-process scheduling state, created the first time the process is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessControl {
    /// Cycles of CPU time left before forced preemption.
    pub quantum_remaining: u64,
    /// Cycle at which the armed timer fires, if one is armed.
    pub timer_deadline: Option<Cycle>,
}

/// Counters kept by [`RoundRobinScheduler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Context switches into a real process.
    pub dispatches: u64,
    /// Running processes sent back to `ready` by timer expiry.
    pub preemptions: u64,
    /// Timer expiries with nothing else runnable; the running process kept the CPU.
    pub quantum_renewals: u64,
    /// Faults that blocked their process.
    pub faults_blocked: u64,
    /// Faults deferred because they coincided with quantum expiry.
    pub faults_deferred: u64,
    /// Processes retired.
    pub terminations: u64,
}

/// Round-robin scheduler over a pending-event table.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: u64,
    switch_overhead: u64,
    /// First cycle a process may start after the most recent termination.
    idle_until: Cycle,
    events: EventTable,
    ready: VecDeque<ProcessId>,
    fault_recovered: VecDeque<ProcessId>,
    blocked: VecDeque<(ProcessId, PageId)>,
    control: HashMap<ProcessId, ProcessControl>,
    stats: SchedulerStats,
}

impl RoundRobinScheduler {
    /// Creates a scheduler with empty queues.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            quantum: config.quantum,
            switch_overhead: config.context_switch_overhead,
            idle_until: 0,
            events: EventTable::new(),
            ready: VecDeque::new(),
            fault_recovered: VecDeque::new(),
            blocked: VecDeque::new(),
            control: HashMap::new(),
            stats: SchedulerStats::default(),
        }
    }

    /// The full quantum length.
    pub const fn quantum(&self) -> u64 {
        self.quantum
    }

    /// Pending events.
    pub const fn events(&self) -> &EventTable {
        &self.events
    }

    /// Processes eligible to run, in service order.
    pub const fn ready(&self) -> &VecDeque<ProcessId> {
        &self.ready
    }

    /// Processes whose page became resident, in service order.
    pub const fn fault_recovered(&self) -> &VecDeque<ProcessId> {
        &self.fault_recovered
    }

    /// Processes waiting on a swap-in, with the page each waits for.
    pub const fn blocked(&self) -> &VecDeque<(ProcessId, PageId)> {
        &self.blocked
    }

    /// Scheduling state of `process`, if it has been dispatched and not retired.
    pub fn control(&self, process: &ProcessId) -> Option<ProcessControl> {
        self.control.get(process).copied()
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Checks the queue-membership and timer invariants against the running process.
    ///
    /// # Panics
    ///
    /// Panics if a process is in more than one of {running, ready, fault-recovered,
    /// blocked}, if an armed timer belongs to anything but the running process, or if
    /// the timer events and recorded deadlines disagree.
    pub fn assert_invariants(&self, running: Option<&ProcessId>) {
        let mut seen = HashSet::new();
        let members = running
            .into_iter()
            .chain(self.ready.iter())
            .chain(self.fault_recovered.iter())
            .chain(self.blocked.iter().map(|(pid, _)| pid));
        for pid in members {
            assert!(seen.insert(pid), "process {pid} is in more than one queue");
        }

        let mut armed = 0;
        for (pid, control) in &self.control {
            if let Some(deadline) = control.timer_deadline {
                armed += 1;
                assert_eq!(
                    Some(pid),
                    running,
                    "process {pid} holds a timer but is not running"
                );
                assert!(
                    self.events.contains(deadline, EventKind::Timer),
                    "process {pid} records a deadline at {deadline} with no timer pending"
                );
            }
        }
        assert_eq!(
            armed,
            self.events.count(EventKind::Timer),
            "timer events do not match recorded deadlines"
        );
    }

    fn queues_empty(&self) -> bool {
        self.ready.is_empty() && self.fault_recovered.is_empty() && self.blocked.is_empty()
    }

    fn is_queued(&self, process: &ProcessId) -> bool {
        self.ready.contains(process)
            || self.fault_recovered.contains(process)
            || self.blocked.iter().any(|(pid, _)| pid == process)
    }

    fn assert_unqueued(&self, process: &ProcessId) {
        assert!(
            !self.is_queued(process),
            "process {process} is already queued"
        );
    }

    /// Returns the control block of `process`, creating it with a full quantum.
    fn control_entry(&mut self, process: &ProcessId) -> &mut ProcessControl {
        let quantum = self.quantum;
        self.control
            .entry(process.clone())
            .or_insert(ProcessControl {
                quantum_remaining: quantum,
                timer_deadline: None,
            })
    }

    fn arm_timer(&mut self, process: &ProcessId, deadline: Cycle) {
        self.events.schedule(deadline, Event::Timer);
        self.control_entry(process).timer_deadline = Some(deadline);
    }

    fn revoke_timer(&mut self, process: &ProcessId) {
        if let Some(deadline) = self
            .control
            .get_mut(process)
            .and_then(|control| control.timer_deadline.take())
        {
            let revoked = self.events.revoke(deadline, EventKind::Timer);
            assert!(
                revoked.is_some(),
                "process {process} records a deadline at {deadline} with no timer pending"
            );
        }
    }

    /// Another process could take the CPU at `time`.
    fn other_runnable_at(&self, time: Cycle) -> bool {
        self.events.contains(time, EventKind::ProcessArrival)
            || self.events.contains(time, EventKind::DiskCompletion)
            || !self.ready.is_empty()
            || !self.fault_recovered.is_empty()
    }

    fn admit(&mut self, process: ProcessId) {
        assert!(
            !self.control.contains_key(&process),
            "process {process} arrived while already admitted"
        );
        self.assert_unqueued(&process);
        debug!(%process, "arrived");
        self.ready.push_back(process);
    }

    /// Moves every process blocked on `page` to `fault_recovered`.
    fn unblock(&mut self, page: &PageId) {
        let (woken, still_blocked): (VecDeque<_>, VecDeque<_>) =
            std::mem::take(&mut self.blocked)
                .into_iter()
                .partition(|(_, awaited)| awaited == page);
        self.blocked = still_blocked;
        for (process, _) in woken {
            debug!(%process, %page, "page resident; process recovered");
            self.assert_unqueued(&process);
            self.fault_recovered.push_back(process);
        }
    }

    fn decide(&mut self, time: Cycle, current: &Runnable, cpu: &mut dyn ContextSwitch) {
        let quantum = self.quantum;
        let Some(next) = self
            .fault_recovered
            .pop_front()
            .or_else(|| self.ready.pop_front())
        else {
            if let Some(running) = current.process() {
                self.revoke_timer(running);
                self.control_entry(running).quantum_remaining = quantum;
                self.arm_timer(running, time + quantum);
                self.stats.quantum_renewals += 1;
                trace!(process = %running, time, "nothing else runnable; quantum renewed");
            }
            return;
        };

        if let Some(running) = current.process() {
            self.revoke_timer(running);
            self.control_entry(running).quantum_remaining = quantum;
            self.assert_unqueued(running);
            self.ready.push_back(running.clone());
            self.stats.preemptions += 1;
            debug!(process = %running, time, "preempted");
        }

        let remaining = self.control_entry(&next).quantum_remaining;
        debug_assert!(remaining > 0, "process {next} dispatched with an empty quantum");
        let start = time.max(self.idle_until);
        self.arm_timer(&next, start + remaining);
        self.stats.dispatches += 1;
        debug!(process = %next, time, start, quantum = remaining, "dispatched");
        cpu.context_switch(Runnable::Process(next), start);
    }
}

impl Scheduler for RoundRobinScheduler {
    fn notify_process_created(&mut self, time: Cycle, process: ProcessId) {
        self.events.schedule(time, Event::ProcessArrival(process));
    }

    fn notify_disk_completion(&mut self, time: Cycle, page: PageId) {
        self.events.schedule(time, Event::DiskCompletion(page));
    }

    fn tick(&mut self, time: Cycle, current: &Runnable, cpu: &mut dyn ContextSwitch) -> bool {
        if self.events.is_empty() && self.queues_empty() {
            return false;
        }

        for event in self.events.take_due(time, EventKind::ProcessArrival) {
            if let Event::ProcessArrival(process) = event {
                self.admit(process);
            }
        }

        for event in self.events.take_due(time, EventKind::DiskCompletion) {
            if let Event::DiskCompletion(page) = event {
                self.unblock(&page);
            }
        }

        let timer_fired = self.events.revoke(time, EventKind::Timer).is_some();
        if let Some(control) = current
            .process()
            .and_then(|running| self.control.get_mut(running))
            .filter(|control| timer_fired && control.timer_deadline == Some(time))
        {
            control.timer_deadline = None;
        }

        if timer_fired || current.is_idle() {
            self.decide(time, current, cpu);
        }
        true
    }

    fn notify_process_termination(
        &mut self,
        time: Cycle,
        process: &ProcessId,
        cpu: &mut dyn ContextSwitch,
    ) {
        self.revoke_timer(process);
        assert!(
            self.control.remove(process).is_some(),
            "termination reported for process {process}, which was never dispatched"
        );
        self.stats.terminations += 1;
        self.idle_until = time + self.switch_overhead;
        debug!(%process, time, resume_at = self.idle_until, "terminated");
        cpu.context_switch(Runnable::Idle, self.idle_until);
    }

    fn notify_page_fault(
        &mut self,
        time: Cycle,
        process: &ProcessId,
        page: &PageId,
        memory: &mut dyn MemoryManager,
        cpu: &mut dyn ContextSwitch,
    ) {
        let Some(control) = self.control(process) else {
            panic!("page fault reported for process {process}, which was never dispatched");
        };

        let expiring = control.timer_deadline == Some(time);
        if expiring && self.other_runnable_at(time) {
            self.stats.faults_deferred += 1;
            debug!(%process, %page, time, "fault coincides with quantum expiry; deferred");
            return;
        }

        let remaining = match control.timer_deadline {
            Some(deadline) if deadline > time => deadline - time,
            _ => self.quantum,
        };
        self.revoke_timer(process);
        self.control_entry(process).quantum_remaining = remaining;

        if let SwapOutcome::Started { completes_at } = memory.begin_swap(time, process, page) {
            self.notify_disk_completion(completes_at, page.clone());
        }

        self.assert_unqueued(process);
        self.blocked.push_back((process.clone(), page.clone()));
        self.stats.faults_blocked += 1;
        debug!(%process, %page, time, quantum_left = remaining, "blocked on page fault");
        cpu.context_switch(Runnable::Idle, time);
    }
}
