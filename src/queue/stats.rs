/*!
 * Queue Statistics
 * Lock-free observability counters
 *
 * Counters are written while the queue lock is held and read without it.
 * Reads are snapshots, eventually consistent with in-flight operations, and
 * must not drive correctness decisions.
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic counters mirrored from the locked queue state
#[derive(Debug, Default)]
#[repr(C, align(64))]
pub(crate) struct QueueCounters {
    size: AtomicUsize,
    waiting: AtomicUsize,
    visited: AtomicUsize,
    enqueued: AtomicUsize,
}

impl QueueCounters {
    #[inline]
    pub fn item_enqueued(&self) {
        self.size.fetch_add(1, Ordering::Release);
        self.enqueued.fetch_add(1, Ordering::Release);
    }

    #[inline]
    pub fn item_processed(&self) {
        self.size.fetch_sub(1, Ordering::Release);
        self.visited.fetch_add(1, Ordering::Release);
    }

    #[inline]
    pub fn waiter_registered(&self) {
        self.waiting.fetch_add(1, Ordering::Release);
    }

    #[inline]
    pub fn waiter_released(&self) {
        self.waiting.fetch_sub(1, Ordering::Release);
    }

    pub fn reset(&self) {
        self.size.store(0, Ordering::Release);
        self.waiting.store(0, Ordering::Release);
        self.visited.store(0, Ordering::Release);
        self.enqueued.store(0, Ordering::Release);
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }

    #[inline]
    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::Acquire)
    }

    #[inline]
    pub fn enqueued(&self) -> usize {
        self.enqueued.load(Ordering::Acquire)
    }
}

/// Point-in-time snapshot of a queue's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    /// Items currently queued
    pub size: usize,
    /// Consumers currently registered as waiters
    pub waiting: usize,
    /// Items removed since creation (or the last shutdown)
    pub visited: usize,
    /// Items appended since creation (or the last shutdown)
    pub enqueued: usize,
    pub closed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_items() {
        let counters = QueueCounters::default();
        counters.item_enqueued();
        counters.item_enqueued();
        counters.item_processed();

        assert_eq!(counters.size(), 1);
        assert_eq!(counters.visited(), 1);
        assert_eq!(counters.enqueued(), 2);
        assert_eq!(counters.visited() + counters.size(), counters.enqueued());
    }

    #[test]
    fn test_reset() {
        let counters = QueueCounters::default();
        counters.item_enqueued();
        counters.waiter_registered();
        counters.reset();

        assert_eq!(counters.size(), 0);
        assert_eq!(counters.waiting(), 0);
        assert_eq!(counters.enqueued(), 0);
    }
}
