//! Simulation statistics collection and reporting.
//!
//! This module tracks what a run did. It provides:
//! 1. **Cycle breakdown:** Total cycles split into running, idle, and context-switch cycles.
//! 2. **References:** Serviced memory references and raised page faults.
//! 3. **Scheduling:** Dispatches, preemptions, deferred faults, and terminations.
//! 4. **Paging:** Swaps started, swaps joined, and evictions.
//! 5. **Timeline:** Every context switch with its decision and start cycles.

use std::time::Instant;

use crate::common::{Cycle, Runnable};
use crate::core::mmu::MemoryStats;
use crate::core::sched::SchedulerStats;

/// One context switch issued by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRecord {
    /// Cycle during which the switch was decided.
    pub at: Cycle,
    /// New current runnable.
    pub next: Runnable,
    /// First cycle `next` may execute.
    pub start: Cycle,
}

/// Counters kept by the execution unit.
#[derive(Debug, Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Cycles stepped, excluding the final cycle on which the end was observed.
    pub cycles: u64,
    /// Cycles in which a process executed a step.
    pub busy_cycles: u64,
    /// Cycles with the idle pseudo-process current.
    pub idle_cycles: u64,
    /// Cycles a dispatched process spent waiting for its start cycle.
    pub switch_cycles: u64,
    /// References that hit a resident page.
    pub references: u64,
    /// References that missed and were reported as page faults.
    pub page_faults: u64,
    /// Context switches received from the scheduler, idle included.
    pub context_switches: u64,
    /// Processes whose trace ran out.
    pub processes_completed: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            busy_cycles: 0,
            idle_cycles: 0,
            switch_cycles: 0,
            references: 0,
            page_faults: 0,
            context_switches: 0,
            processes_completed: 0,
        }
    }
}

impl SimStats {
    /// Host time elapsed since these counters were created.
    pub fn host_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Fraction of stepped cycles in which a process executed.
    pub fn utilization(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.busy_cycles as f64 / self.cycles as f64
        }
    }
}

/// Section names for selective report output.
///
/// Valid section identifiers: `"summary"`, `"cpu"`, `"scheduler"`, `"memory"`.
pub const STATS_SECTIONS: &[&str] = &["summary", "cpu", "scheduler", "memory"];

/// Everything a finished run reports.
#[derive(Debug, Clone)]
pub struct SimReport {
    /// Execution unit counters.
    pub sim: SimStats,
    /// Scheduler counters.
    pub scheduler: SchedulerStats,
    /// Memory manager counters.
    pub memory: MemoryStats,
    /// Simulated clock rate used to convert cycles to seconds.
    pub cycles_per_second: u64,
}

impl SimReport {
    /// Simulated time covered by the run, in seconds.
    pub fn simulated_seconds(&self) -> f64 {
        self.sim.cycles as f64 / self.cycles_per_second.max(1) as f64
    }

    /// Prints only the requested sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty
    /// slice to print every section.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let sim = &self.sim;

        if want("summary") {
            println!("\n==========================================================");
            println!("KERNEL SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", sim.host_seconds());
            println!("sim_cycles               {}", sim.cycles);
            println!("sim_seconds              {:.6} s", self.simulated_seconds());
            println!("sim_processes            {}", sim.processes_completed);
            println!("sim_references           {}", sim.references);
            println!("----------------------------------------------------------");
        }
        if want("cpu") {
            let pct = |n: u64| {
                if sim.cycles == 0 {
                    0.0
                } else {
                    n as f64 / sim.cycles as f64 * 100.0
                }
            };
            println!("CPU BREAKDOWN");
            println!(
                "  busy                   {:<10} ({:.2}%)",
                sim.busy_cycles,
                pct(sim.busy_cycles)
            );
            println!(
                "  idle                   {:<10} ({:.2}%)",
                sim.idle_cycles,
                pct(sim.idle_cycles)
            );
            println!(
                "  switching              {:<10} ({:.2}%)",
                sim.switch_cycles,
                pct(sim.switch_cycles)
            );
            println!("  context_switches       {}", sim.context_switches);
            println!("----------------------------------------------------------");
        }
        if want("scheduler") {
            let sched = &self.scheduler;
            println!("SCHEDULER");
            println!("  dispatches             {}", sched.dispatches);
            println!("  preemptions            {}", sched.preemptions);
            println!("  quantum_renewals       {}", sched.quantum_renewals);
            println!("  faults_blocked         {}", sched.faults_blocked);
            println!("  faults_deferred        {}", sched.faults_deferred);
            println!("  terminations           {}", sched.terminations);
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            let total = sim.references + sim.page_faults;
            let miss_rate = if total == 0 {
                0.0
            } else {
                sim.page_faults as f64 / total as f64 * 100.0
            };
            println!("MEMORY");
            println!(
                "  page_faults            {:<10} ({miss_rate:.2}% of lookups)",
                sim.page_faults
            );
            println!("  swaps_started          {}", self.memory.swaps_started);
            println!("  swaps_joined           {}", self.memory.swaps_joined);
            println!("  evictions              {}", self.memory.evictions);
            println!("==========================================================");
        }
    }

    /// Prints every section to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
