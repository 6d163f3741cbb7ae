/*!
 * Waiter Registry
 * Blocked consumers in registration order, each with a private notification
 *
 * # Entitlement
 *
 * A waiter registered with `waiting_on_index = k` may only consume the item
 * whose sequence index is `k`. Registered indices are contiguous and start at
 * the index of the next item to leave the item queue, so the front waiter is
 * always the one entitled to the front item. When a consumer that never
 * registered takes the front item, every entitlement moves up one index.
 *
 * `index_for` is a linear scan. Blocked-consumer counts are expected to be
 * small, and the scan runs once per dequeue loop iteration.
 */

use super::items::{ItemQueue, SequenceIndex};
use crate::core::errors::QueueResult;
use crate::core::sync::{Notification, WakeResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::Instant;

/// Wake channel shared between the registry and the blocked thread
///
/// The registry drops its handle when the entry leaves; the thread's handle
/// keeps the notification alive until it stops waiting on it.
#[derive(Debug, Default)]
pub(crate) struct Waiter {
    notification: Notification,
    terminated: AtomicBool,
}

impl Waiter {
    pub fn wait<S>(&self, guard: &mut parking_lot::MutexGuard<'_, S>) {
        self.notification.wait(guard);
    }

    pub fn wait_until<S>(&self, guard: &mut parking_lot::MutexGuard<'_, S>, deadline: Instant) -> bool {
        self.notification.wait_until(guard, deadline)
    }

    pub fn notify(&self) -> WakeResult {
        self.notification.notify()
    }

    /// Set by shutdown before the final signal
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    fn terminate(&self) -> WakeResult {
        self.terminated.store(true, Ordering::Release);
        self.notify()
    }
}

/// Registry record for one blocked consumer
#[derive(Debug)]
pub(crate) struct WaiterEntry {
    pub thread: ThreadId,
    pub waiting_on_index: SequenceIndex,
    pub waiter: Arc<Waiter>,
}

/// FIFO registry of blocked consumers
///
/// Not synchronized: every caller holds the queue lock.
#[derive(Debug)]
pub(crate) struct WaiterRegistry {
    entries: VecDeque<WaiterEntry>,
}

impl WaiterRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Index the next registered waiter would be entitled to
    pub fn next_index<T>(&self, items: &ItemQueue<T>) -> SequenceIndex {
        items.processed() + self.entries.len() as u64
    }

    /// Register `thread` behind every existing waiter
    pub fn register_current_thread<T>(
        &mut self,
        thread: ThreadId,
        items: &ItemQueue<T>,
    ) -> QueueResult<(SequenceIndex, Arc<Waiter>)> {
        self.entries.try_reserve(1)?;

        let waiting_on_index = self.next_index(items);
        let waiter = Arc::new(Waiter::default());
        self.entries.push_back(WaiterEntry {
            thread,
            waiting_on_index,
            waiter: Arc::clone(&waiter),
        });
        Ok((waiting_on_index, waiter))
    }

    pub fn index_for(&self, thread: ThreadId) -> Option<SequenceIndex> {
        self.entries
            .iter()
            .find(|entry| entry.thread == thread)
            .map(|entry| entry.waiting_on_index)
    }

    /// Front waiter, if the item it is entitled to is already queued
    pub fn ready_front<T>(&self, items: &ItemQueue<T>) -> Option<Arc<Waiter>> {
        let front = self.entries.front()?;
        let front_item = items.front_index()?;
        (front.waiting_on_index <= front_item).then(|| Arc::clone(&front.waiter))
    }

    pub fn pop_front_and_release(&mut self) -> Option<WaiterEntry> {
        self.entries.pop_front()
    }

    /// Remove `thread` without it being served
    ///
    /// Everyone behind it moves up one index so entitlements stay contiguous.
    pub fn remove(&mut self, thread: ThreadId) -> Option<WaiterEntry> {
        let position = self.entries.iter().position(|entry| entry.thread == thread)?;
        let removed = self.entries.remove(position)?;
        for entry in self.entries.iter_mut().skip(position) {
            entry.waiting_on_index -= 1;
        }
        Some(removed)
    }

    /// Shift every entitlement to the next index
    ///
    /// Called after an unregistered consumer takes the front item, which was
    /// not promised to anyone.
    pub fn advance_indices(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.waiting_on_index += 1;
        }
    }

    /// Mark and signal every waiter, then empty the registry
    pub fn terminate_all_and_clear(&mut self) -> WakeResult {
        let woken = self
            .entries
            .iter()
            .map(|entry| entry.waiter.terminate().count())
            .sum();
        self.entries.clear();
        WakeResult::from_count(woken)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn thread_ids(n: usize) -> Vec<ThreadId> {
        (0..n)
            .map(|_| thread::spawn(|| thread::current().id()).join().unwrap())
            .collect()
    }

    #[test]
    fn test_register_assigns_contiguous_indices() {
        let items: ItemQueue<u32> = ItemQueue::with_capacity(0);
        let mut registry = WaiterRegistry::with_capacity(4);
        let ids = thread_ids(3);

        for (expected, id) in ids.iter().enumerate() {
            let (index, _) = registry.register_current_thread(*id, &items).unwrap();
            assert_eq!(index, expected as u64);
        }

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.index_for(ids[2]), Some(2));
        assert_eq!(registry.index_for(thread::current().id()), None);
    }

    #[test]
    fn test_indices_start_after_processed_items() {
        let mut items = ItemQueue::with_capacity(4);
        items.append(1).unwrap();
        items.append(2).unwrap();
        items.pop_front();
        items.pop_front();

        let mut registry = WaiterRegistry::with_capacity(4);
        let (index, _) = registry
            .register_current_thread(thread::current().id(), &items)
            .unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn test_ready_front_requires_item() {
        let mut items = ItemQueue::with_capacity(4);
        let mut registry = WaiterRegistry::with_capacity(4);
        let ids = thread_ids(2);
        registry.register_current_thread(ids[0], &items).unwrap();
        registry.register_current_thread(ids[1], &items).unwrap();

        assert!(registry.ready_front(&items).is_none());

        items.append("x").unwrap();
        assert!(registry.ready_front(&items).is_some());

        let entry = registry.pop_front_and_release().unwrap();
        assert_eq!(entry.thread, ids[0]);
        items.pop_front();

        // Second waiter is entitled to index 1, which has not arrived
        assert!(registry.ready_front(&items).is_none());
    }

    #[test]
    fn test_remove_shifts_later_waiters() {
        let items: ItemQueue<u32> = ItemQueue::with_capacity(0);
        let mut registry = WaiterRegistry::with_capacity(4);
        let ids = thread_ids(3);
        for id in &ids {
            registry.register_current_thread(*id, &items).unwrap();
        }

        let removed = registry.remove(ids[1]).unwrap();
        assert_eq!(removed.waiting_on_index, 1);
        assert_eq!(registry.index_for(ids[0]), Some(0));
        assert_eq!(registry.index_for(ids[2]), Some(1));
        assert!(registry.remove(ids[1]).is_none());
    }

    #[test]
    fn test_advance_keeps_front_aligned() {
        let mut items = ItemQueue::with_capacity(4);
        let mut registry = WaiterRegistry::with_capacity(4);
        let ids = thread_ids(2);
        registry.register_current_thread(ids[0], &items).unwrap();
        registry.register_current_thread(ids[1], &items).unwrap();
        for i in 0..3 {
            items.append(i).unwrap();
        }

        // Item 0 goes to a consumer that never registered
        items.pop_front();
        registry.advance_indices();

        assert_eq!(registry.index_for(ids[0]), items.front_index());
        assert_eq!(registry.index_for(ids[1]), Some(2));
        assert_eq!(registry.next_index(&items), 3);
        assert!(registry.ready_front(&items).is_some());
    }

    #[test]
    fn test_terminate_all_marks_and_clears() {
        let items: ItemQueue<u32> = ItemQueue::with_capacity(0);
        let mut registry = WaiterRegistry::with_capacity(4);
        let handles: Vec<_> = thread_ids(3)
            .into_iter()
            .map(|id| registry.register_current_thread(id, &items).unwrap().1)
            .collect();

        // Nobody is parked, so nothing is actually woken
        assert_eq!(registry.terminate_all_and_clear(), WakeResult::NoWaiters);
        assert!(registry.is_empty());
        assert!(handles.iter().all(|waiter| waiter.is_terminated()));
    }
}
