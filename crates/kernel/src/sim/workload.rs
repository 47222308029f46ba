//! Process arrival feed.
//!
//! A workload lists the processes of a run and the cycle each one arrives on. It is
//! the only way processes enter the simulation: submitting a workload schedules one
//! arrival event per process.
//!
//! ```json
//! { "processes": [ { "name": "editor", "arrival": 0 }, { "name": "compiler", "arrival": 40 } ] }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{Cycle, ProcessId, WorkloadError};
use crate::core::sched::Scheduler;

/// One process of a workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Process name; also the stem of its trace file.
    pub name: ProcessId,
    /// Cycle on which the process arrives.
    #[serde(default)]
    pub arrival: Cycle,
}

impl ProcessSpec {
    /// Creates a process arriving at `arrival`.
    pub fn new(name: &str, arrival: Cycle) -> Self {
        Self {
            name: ProcessId::new(name),
            arrival,
        }
    }
}

/// The processes of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Processes in listing order.
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    /// Creates a workload from process specifications.
    pub const fn new(processes: Vec<ProcessSpec>) -> Self {
        Self { processes }
    }

    /// Parses and validates a workload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadError::Parse`] for malformed JSON, otherwise the errors of
    /// [`Workload::validate`].
    pub fn from_json(json: &str) -> Result<Self, WorkloadError> {
        let workload: Self = serde_json::from_str(json)?;
        workload.validate()?;
        Ok(workload)
    }

    /// Reads, parses, and validates a workload file.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadError::Io`] if the file cannot be read, otherwise the errors
    /// of [`Workload::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| WorkloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Returns `true` if no process is listed.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Checks that the workload can be submitted.
    ///
    /// # Errors
    ///
    /// - [`WorkloadError::Empty`] if no process is listed.
    /// - [`WorkloadError::InvalidName`] if a name cannot serve as a trace file stem.
    /// - [`WorkloadError::DuplicateProcess`] if a name repeats.
    /// - [`WorkloadError::ArrivalCollision`] if two processes share an arrival cycle.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.processes.is_empty() {
            return Err(WorkloadError::Empty);
        }

        let mut names = HashSet::new();
        let mut arrivals: HashMap<Cycle, &ProcessId> = HashMap::new();
        for spec in &self.processes {
            let name = spec.name.as_str();
            if name.is_empty()
                || name.contains(['/', '\\'])
                || name.chars().any(char::is_whitespace)
            {
                return Err(WorkloadError::InvalidName(name.to_owned()));
            }
            if !names.insert(&spec.name) {
                return Err(WorkloadError::DuplicateProcess(spec.name.clone()));
            }
            if let Some(first) = arrivals.insert(spec.arrival, &spec.name) {
                return Err(WorkloadError::ArrivalCollision {
                    time: spec.arrival,
                    first: first.clone(),
                    second: spec.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Schedules the arrival of every process.
    pub fn submit(&self, scheduler: &mut dyn Scheduler) {
        for spec in &self.processes {
            scheduler.notify_process_created(spec.arrival, spec.name.clone());
        }
    }
}
