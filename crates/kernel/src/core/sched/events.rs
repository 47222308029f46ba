//! Pending event table.
//!
//! Events are keyed by `(trigger time, kind)`. A key holds at most one event; a second
//! schedule for the same key means the scheduler lost track of its own state, so it
//! panics instead of overwriting.

use std::collections::BTreeMap;

use crate::common::{Cycle, PageId, ProcessId};

/// Event category. The derived order is also the key order within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// Quantum expiry of the running process.
    Timer,
    /// A swap-in finished.
    DiskCompletion,
    /// A process enters the system.
    ProcessArrival,
}

/// A pending event and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Quantum expiry.
    Timer,
    /// The named page finished swapping in.
    DiskCompletion(PageId),
    /// The named process arrives.
    ProcessArrival(ProcessId),
}

impl Event {
    /// Returns the category of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Timer => EventKind::Timer,
            Self::DiskCompletion(_) => EventKind::DiskCompletion,
            Self::ProcessArrival(_) => EventKind::ProcessArrival,
        }
    }
}

/// Unique key of a pending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    /// Absolute trigger cycle.
    pub time: Cycle,
    /// Event category.
    pub kind: EventKind,
}

/// Ordered table of pending events.
#[derive(Debug, Default, Clone)]
pub struct EventTable {
    entries: BTreeMap<EventKey, Event>,
}

impl EventTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `event` to fire at `time`.
    ///
    /// # Panics
    ///
    /// Panics if an event of the same kind is already pending at `time`.
    pub fn schedule(&mut self, time: Cycle, event: Event) {
        let key = EventKey {
            time,
            kind: event.kind(),
        };
        if let Some(existing) = self.entries.insert(key, event) {
            panic!(
                "event {:?} double-scheduled at cycle {time} (already held {existing:?})",
                key.kind
            );
        }
    }

    /// Removes and returns the event pending at `(time, kind)`, if any.
    pub fn revoke(&mut self, time: Cycle, kind: EventKind) -> Option<Event> {
        self.entries.remove(&EventKey { time, kind })
    }

    /// Returns `true` if an event of `kind` is pending at exactly `time`.
    pub fn contains(&self, time: Cycle, kind: EventKind) -> bool {
        self.entries.contains_key(&EventKey { time, kind })
    }

    /// Removes every event of `kind` triggering at or before `time`, oldest first.
    pub fn take_due(&mut self, time: Cycle, kind: EventKind) -> Vec<Event> {
        // ProcessArrival is the greatest kind, so this bound covers all of `time`.
        let bound = EventKey {
            time,
            kind: EventKind::ProcessArrival,
        };
        let due: Vec<EventKey> = self
            .entries
            .range(..=bound)
            .filter(|(key, _)| key.kind == kind)
            .map(|(key, _)| *key)
            .collect();
        due.into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending events in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &Event)> + '_ {
        self.entries.iter()
    }

    /// Number of pending events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.keys().filter(|key| key.kind == kind).count()
    }
}
