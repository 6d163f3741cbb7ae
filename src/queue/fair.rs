/*!
 * Fair Queue
 * Queue handle and the lock-protected state it coordinates
 */

use super::config::QueueConfig;
use super::items::{Item, ItemQueue};
use super::stats::QueueCounters;
use super::waiters::{Waiter, WaiterRegistry};
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::ThreadId;

/// Unbounded blocking FIFO queue with fair consumer hand-off
///
/// Consumers blocked in [`dequeue`](FairQueue::dequeue) are served in the
/// order they started waiting, each woken through its own notification.
/// Share between threads with `Arc<FairQueue<T>>`.
///
/// # Examples
///
/// ```
/// use fair_queue::FairQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(FairQueue::new());
/// let consumer = {
///     let queue = queue.clone();
///     thread::spawn(move || queue.dequeue())
/// };
///
/// queue.enqueue("job").unwrap();
/// assert_eq!(consumer.join().unwrap().unwrap(), "job");
/// ```
pub struct FairQueue<T> {
    pub(super) config: QueueConfig,
    pub(super) state: Mutex<QueueState<T>>,
    pub(super) counters: QueueCounters,
    /// Written only with `state` locked
    pub(super) closed: AtomicBool,
}

/// Everything the queue lock protects
pub(super) struct QueueState<T> {
    pub items: ItemQueue<T>,
    pub waiters: WaiterRegistry,
}

impl<T> QueueState<T> {
    pub fn new(config: &QueueConfig) -> Self {
        Self {
            items: ItemQueue::with_capacity(config.initial_capacity),
            waiters: WaiterRegistry::with_capacity(config.waiter_capacity),
        }
    }

    /// Whether `thread` has to wait for an earlier consumer or a new item
    ///
    /// A registered waiter only ever takes the item it is entitled to, which
    /// is at the front once everyone ahead of it is served. A newcomer may
    /// take the front item only while some queued item is not yet promised
    /// to a registered waiter.
    pub fn must_yield(&self, thread: ThreadId) -> bool {
        let Some(front) = self.items.front_index() else {
            return true;
        };
        match self.waiters.index_for(thread) {
            Some(index) => index > front,
            None => {
                self.waiters.len() >= self.items.len()
                    && self.waiters.next_index(&self.items) > front
            }
        }
    }

    /// Take the front item if `thread` may have it
    ///
    /// A registered thread can only pass the yield check from the front of
    /// the registry, so its entry is the one released. A newcomer taking an
    /// unpromised item moves every registered entitlement up one index.
    pub fn claim(&mut self, thread: ThreadId, registered: bool) -> Option<Item<T>> {
        if self.must_yield(thread) {
            return None;
        }

        let item = self.items.pop_front()?;
        if registered {
            let entry = self.waiters.pop_front_and_release();
            debug_assert_eq!(entry.map(|e| e.thread), Some(thread));
        } else {
            self.waiters.advance_indices();
        }
        Some(item)
    }

    /// Waiter to signal after the state changed, if its item is queued
    pub fn ready_front(&self) -> Option<Arc<Waiter>> {
        self.waiters.ready_front(&self.items)
    }
}
