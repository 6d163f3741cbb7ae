/*!
 * Per-Waiter Notification
 *
 * A single-waiter wake channel built on parking_lot::Condvar.
 *
 * # Design: One Condvar Per Waiter
 *
 * The queue keeps one `Notification` per blocked consumer rather than one
 * shared condvar. Signalling a notification reaches only its owner, which lets
 * a producer hand an item to the specific consumer entitled to it.
 *
 * A notification must always be waited on with guards of the same mutex.
 * Spurious wakeups are possible; callers re-check their condition in a loop.
 */

use super::types::WakeResult;
use parking_lot::{Condvar, MutexGuard};
use std::time::Instant;

/// Owned wake primitive for exactly one waiting thread
#[derive(Debug, Default)]
pub struct Notification {
    condvar: Condvar,
}

impl Notification {
    pub const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
        }
    }

    /// Block until notified, releasing `guard` while parked
    #[inline]
    pub fn wait<T: ?Sized>(&self, guard: &mut MutexGuard<'_, T>) {
        self.condvar.wait(guard);
    }

    /// Block until notified or `deadline` passes
    ///
    /// Returns `true` if woken before the deadline, `false` on timeout.
    #[inline]
    pub fn wait_until<T: ?Sized>(&self, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> bool {
        !self.condvar.wait_until(guard, deadline).timed_out()
    }

    /// Wake the owning thread if it is parked
    #[inline]
    pub fn notify(&self) -> WakeResult {
        if self.condvar.notify_one() {
            WakeResult::Woken(1)
        } else {
            WakeResult::NoWaiters
        }
    }
}
