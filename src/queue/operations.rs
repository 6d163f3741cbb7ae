/*!
 * Queue Operations
 * Enqueue, blocking and timed dequeue, and non-blocking dequeue
 *
 * # Hand-off protocol
 *
 * A newcomer may take the front item only while more items are queued than
 * consumers are registered; otherwise every queued item is promised to an
 * earlier consumer. A consumer that has to wait registers in the waiter
 * registry and parks on its own notification. Producers signal only the front waiter,
 * and only once the item it is entitled to is queued. A consumer that takes an
 * item passes the baton: if the next waiter's item is already queued, it is
 * signalled before the taker returns. Every signal is sent after the lock is
 * released, and every wake re-checks the state under the lock.
 */

use super::fair::FairQueue;
use super::waiters::Waiter;
use crate::core::errors::{EnqueueError, QueueError, QueueResult};
use crate::monitoring::WaitSpan;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

impl<T> FairQueue<T> {
    /// Append an item and wake the consumer entitled to it, if any
    ///
    /// Fails with [`QueueError::Closed`] after shutdown and with
    /// [`QueueError::AllocationFailed`] if the item store cannot grow. The
    /// rejected item is handed back inside the [`EnqueueError`].
    pub fn enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        let mut state = self.state.lock();
        if self.is_closed() {
            return Err(EnqueueError::new(QueueError::Closed, item));
        }

        let index = state.items.append(item).map_err(|e| {
            warn!(queue = %self.config.name, error = %e.error, "Failed to grow item queue");
            e
        })?;
        self.counters.item_enqueued();
        debug_assert_eq!(
            state.items.len() as u64,
            state.items.enqueued() - state.items.processed()
        );
        let ready = state.ready_front();
        drop(state);

        trace!(queue = %self.config.name, index, "Item enqueued");
        if let Some(waiter) = ready {
            waiter.notify();
        }
        Ok(())
    }

    /// Remove the front item, blocking until one is available for this thread
    ///
    /// Consumers that start waiting earlier receive earlier items. Returns
    /// [`QueueError::Closed`] if the queue is shut down, including while this
    /// thread is blocked.
    pub fn dequeue(&self) -> QueueResult<T> {
        self.dequeue_inner(None)
    }

    /// Like [`dequeue`](FairQueue::dequeue), giving up after `timeout`
    ///
    /// A consumer that gives up leaves its place in line; consumers behind it
    /// move up one item.
    pub fn dequeue_timeout(&self, timeout: Duration) -> QueueResult<T> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.dequeue_inner(Some((deadline, timeout))),
            None => self.dequeue(),
        }
    }

    /// Remove the front item without blocking
    ///
    /// Returns `None` if the lock is contended, the queue is empty or closed,
    /// or every queued item is promised to a blocked consumer. Never
    /// registers as a waiter.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.state.try_lock()?;
        if self.is_closed() {
            return None;
        }

        let item = state.claim(thread::current().id(), false)?;
        self.counters.item_processed();
        let ready = state.ready_front();
        drop(state);

        if let Some(next) = ready {
            next.notify();
        }
        Some(item.into_payload())
    }

    fn dequeue_inner(&self, deadline: Option<(Instant, Duration)>) -> QueueResult<T> {
        let thread = thread::current().id();
        let mut state = self.state.lock();
        let mut waiter: Option<Arc<Waiter>> = None;
        let mut wait_span: Option<WaitSpan> = None;

        let item = loop {
            // Shutdown already removed our entry if we had one
            if self.is_closed() || waiter.as_ref().is_some_and(|w| w.is_terminated()) {
                if let Some(span) = &wait_span {
                    span.record_outcome("closed");
                }
                return Err(QueueError::Closed);
            }

            if let Some(item) = state.claim(thread, waiter.is_some()) {
                break item;
            }

            if let Some((deadline, timeout)) = deadline {
                if Instant::now() >= deadline {
                    if waiter.is_some() {
                        state.waiters.remove(thread);
                        self.counters.waiter_released();
                    }
                    let ready = state.ready_front();
                    drop(state);

                    if let Some(span) = &wait_span {
                        span.record_outcome("timeout");
                    }
                    debug!(queue = %self.config.name, ?timeout, "Consumer timed out");
                    if let Some(next) = ready {
                        next.notify();
                    }
                    return Err(QueueError::Timeout(timeout));
                }
            }

            if waiter.is_none() {
                let registration = {
                    let state = &mut *state;
                    state.waiters.register_current_thread(thread, &state.items)
                };
                let (index, registered) = registration.map_err(|e| {
                    warn!(queue = %self.config.name, error = %e, "Failed to register waiter");
                    e
                })?;
                self.counters.waiter_registered();
                trace!(
                    queue = %self.config.name,
                    index,
                    waiters = state.waiters.len(),
                    "Consumer waiting"
                );
                waiter = Some(registered);
                wait_span = Some(WaitSpan::new(&self.config.name, index));
            }

            if let Some(current) = &waiter {
                match deadline {
                    Some((deadline, _)) => {
                        current.wait_until(&mut state, deadline);
                    }
                    None => current.wait(&mut state),
                }
            }
        };

        if waiter.is_some() {
            self.counters.waiter_released();
        }
        if let Some(span) = &wait_span {
            span.record_outcome("served");
        }
        self.counters.item_processed();
        let ready = state.ready_front();
        drop(state);

        trace!(queue = %self.config.name, index = item.sequence_index, "Item dequeued");
        if let Some(next) = ready {
            next.notify();
        }
        Ok(item.into_payload())
    }

    /// Items currently queued (snapshot)
    pub fn size(&self) -> usize {
        self.counters.size()
    }

    /// Consumers currently blocked (snapshot)
    pub fn waiting(&self) -> usize {
        self.counters.waiting()
    }

    /// Items removed so far (snapshot)
    pub fn visited(&self) -> usize {
        self.counters.visited()
    }

    /// Items appended so far (snapshot)
    pub fn enqueued(&self) -> usize {
        self.counters.enqueued()
    }

    /// Alias for `size` (snapshot)
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Whether `size` is zero (snapshot)
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
