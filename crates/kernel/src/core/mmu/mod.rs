//! Memory Manager.
//!
//! Decides whether a referenced page is resident and, when it is not, starts a
//! swap-in and reports when the transfer completes. The scheduler turns that
//! completion time into a disk-completion event, so the memory manager never calls
//! back into the scheduler.

/// FIFO replacement over a fixed set of page frames.
pub mod fifo;

pub use fifo::{FifoMemory, MemoryStats};

use crate::common::{Cycle, PageId, ProcessId};

/// Result of asking the memory manager to swap a page in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// A new transfer was queued on the disk.
    Started {
        /// Cycle at which the page becomes resident.
        completes_at: Cycle,
    },
    /// The page already occupies a frame or is being transferred; no new transfer.
    Joined,
}

/// Page residency and swap management.
pub trait MemoryManager {
    /// Reports whether `page` is usable by `process` at `time`.
    ///
    /// Completed transfers are reconciled first. When `process` is the one whose fault
    /// started the transfer, this first check releases the page for eviction.
    fn is_resident(&mut self, time: Cycle, process: &ProcessId, page: &PageId) -> bool;

    /// Starts a swap-in of `page` on behalf of `process`.
    ///
    /// A page already in flight yields [`SwapOutcome::Joined`] and no second transfer.
    fn begin_swap(&mut self, time: Cycle, process: &ProcessId, page: &PageId) -> SwapOutcome;
}
