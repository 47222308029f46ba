//! First-In, First-Out page replacement.
//!
//! Frames are kept in arrival order. When a swap-in needs a frame and all of them are
//! occupied, the oldest frame that is not busy is evicted. A frame is busy from the
//! moment its transfer is queued until the process that faulted on it has performed a
//! residency check after the transfer completed; this stops a freshly loaded page
//! from being evicted before its requester ever used it.
//!
//! The disk services one transfer at a time, so each transfer completes
//! `swap_latency` cycles after the later of its request and the previous transfer.
//!
//! # Performance
//!
//! - `is_resident()`: O(F) where F is the frame count
//! - `begin_swap()`: O(F)

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use super::{MemoryManager, SwapOutcome};
use crate::common::{Cycle, PageId, ProcessId};
use crate::config::MemoryConfig;

/// One occupied page frame.
#[derive(Debug, Clone)]
struct Frame {
    page: PageId,
    /// First cycle at which the page may be referenced.
    available_at: Cycle,
    /// Not evictable while set.
    busy: bool,
}

/// A transfer that has been queued but not yet reconciled.
#[derive(Debug, Clone)]
struct InFlightSwap {
    requester: ProcessId,
    completes_at: Cycle,
}

/// Counters kept by [`FifoMemory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Transfers queued on the disk.
    pub swaps_started: u64,
    /// Swap requests that attached to a page already in a frame.
    pub swaps_joined: u64,
    /// Frames reclaimed to make room for a transfer.
    pub evictions: u64,
}

/// Demand-paged memory with FIFO replacement and a serialized swap disk.
#[derive(Debug)]
pub struct FifoMemory {
    capacity: usize,
    swap_latency: u64,
    frames: VecDeque<Frame>,
    in_flight: HashMap<PageId, InFlightSwap>,
    /// Pages still waiting for their requester's first check, keyed to that requester.
    awaiting_check: HashMap<PageId, ProcessId>,
    busy_until: Cycle,
    stats: MemoryStats,
}

impl FifoMemory {
    /// Creates an empty memory with the configured frame count and swap latency.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            capacity: config.page_frames,
            swap_latency: config.swap_latency,
            frames: VecDeque::with_capacity(config.page_frames),
            in_flight: HashMap::new(),
            awaiting_check: HashMap::new(),
            busy_until: 0,
            stats: MemoryStats::default(),
        }
    }

    /// Number of page frames.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied frames, including frames whose transfer is outstanding.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is occupied.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pages in frames, oldest first.
    pub fn pages(&self) -> impl Iterator<Item = &PageId> + '_ {
        self.frames.iter().map(|frame| &frame.page)
    }

    /// Whether the frame holding `page` is busy, or `None` if the page has no frame.
    pub fn is_busy(&self, page: &PageId) -> Option<bool> {
        self.frame(page).map(|frame| frame.busy)
    }

    /// Completion cycle of the unreconciled transfer of `page`, if any.
    pub fn in_flight(&self, page: &PageId) -> Option<Cycle> {
        self.in_flight.get(page).map(|swap| swap.completes_at)
    }

    /// Number of unreconciled transfers.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Cycle at which the disk finishes its last queued transfer.
    pub const fn busy_until(&self) -> Cycle {
        self.busy_until
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> MemoryStats {
        self.stats
    }

    fn frame(&self, page: &PageId) -> Option<&Frame> {
        self.frames.iter().find(|frame| &frame.page == page)
    }

    /// Drops the records of transfers that have completed by `time`.
    fn reconcile(&mut self, time: Cycle) {
        self.in_flight.retain(|page, swap| {
            let pending = swap.completes_at > time;
            if !pending {
                trace!(
                    %page,
                    requester = %swap.requester,
                    at = swap.completes_at,
                    "swap-in complete"
                );
            }
            pending
        });
    }

    /// Releases the oldest non-busy frame.
    ///
    /// # Panics
    ///
    /// Panics if every frame is busy; the scheduler never lets that happen with a
    /// frame count at least as large as the number of live processes.
    fn evict(&mut self) {
        let victim = self
            .frames
            .iter()
            .position(|frame| !frame.busy)
            .unwrap_or_else(|| {
                panic!(
                    "page eviction required but all {} frames are busy",
                    self.capacity
                )
            });
        if let Some(frame) = self.frames.remove(victim) {
            debug!(page = %frame.page, "evicted");
            self.stats.evictions += 1;
        }
    }
}

impl MemoryManager for FifoMemory {
    fn is_resident(&mut self, time: Cycle, process: &ProcessId, page: &PageId) -> bool {
        self.reconcile(time);

        if self.awaiting_check.get(page) == Some(process) && !self.in_flight.contains_key(page) {
            let _ = self.awaiting_check.remove(page);
            let frame = self
                .frames
                .iter_mut()
                .find(|frame| &frame.page == page)
                .unwrap_or_else(|| {
                    panic!("page {page} awaits a check by {process} but holds no frame")
                });
            frame.busy = false;
            trace!(%page, %process, "requester observed page; frame released");
        }

        self.frame(page)
            .is_some_and(|frame| frame.available_at <= time)
    }

    fn begin_swap(&mut self, time: Cycle, process: &ProcessId, page: &PageId) -> SwapOutcome {
        self.reconcile(time);

        if self.in_flight.contains_key(page) || self.frame(page).is_some() {
            debug!(%page, %process, "swap already in flight");
            self.stats.swaps_joined += 1;
            return SwapOutcome::Joined;
        }

        let completes_at = time.max(self.busy_until) + self.swap_latency;
        if self.frames.len() >= self.capacity {
            self.evict();
        }

        self.frames.push_back(Frame {
            page: page.clone(),
            available_at: completes_at,
            busy: true,
        });
        self.busy_until = completes_at;
        let _ = self.in_flight.insert(
            page.clone(),
            InFlightSwap {
                requester: process.clone(),
                completes_at,
            },
        );
        let _ = self.awaiting_check.insert(page.clone(), process.clone());
        self.stats.swaps_started += 1;

        debug!(%page, %process, completes_at, "swap-in queued");
        SwapOutcome::Started { completes_at }
    }
}
