/*!
 * Queue Lifecycle Operations
 * Create, shut down, and inspect queue instances
 */

use super::config::QueueConfig;
use super::fair::{FairQueue, QueueState};
use super::stats::{QueueCounters, QueueStats};
use crate::core::errors::{QueueError, QueueResult};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

impl<T> FairQueue<T> {
    /// Create a queue with default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        debug!(
            queue = %config.name,
            initial_capacity = config.initial_capacity,
            waiter_capacity = config.waiter_capacity,
            "Queue initialized"
        );
        Self {
            state: Mutex::new(QueueState::new(&config)),
            counters: QueueCounters::default(),
            closed: AtomicBool::new(false),
            config,
        }
    }

    /// Close the queue and release every blocked consumer
    ///
    /// Queued items are drained and returned to the caller, all counters
    /// reset to zero, and every consumer blocked in `dequeue` returns
    /// [`QueueError::Closed`]. Blocked threads are signalled, never joined.
    /// A second shutdown returns [`QueueError::Closed`].
    #[instrument(skip(self), fields(queue = %self.config.name))]
    pub fn shutdown(&self) -> QueueResult<Vec<T>> {
        let mut state = self.state.lock();
        if self.is_closed() {
            return Err(QueueError::Closed);
        }
        self.closed.store(true, Ordering::Release);

        let drained = state.items.drain();
        let waiters = state.waiters.len();
        let woken = state.waiters.terminate_all_and_clear();
        debug_assert!(state.items.is_empty() && state.waiters.is_empty());
        self.counters.reset();
        drop(state);

        debug!(
            drained = drained.len(),
            waiters,
            parked = woken.count(),
            "Queue shut down"
        );
        Ok(drained)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Lock-free snapshot of all counters
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            name: self.config.name.clone(),
            size: self.counters.size(),
            waiting: self.counters.waiting(),
            visited: self.counters.visited(),
            enqueued: self.counters.enqueued(),
            closed: self.is_closed(),
        }
    }
}

impl<T> Default for FairQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FairQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairQueue")
            .field("stats", &self.stats())
            .finish()
    }
}
