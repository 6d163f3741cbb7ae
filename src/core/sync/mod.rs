/*!
 * Synchronization Primitives
 *
 * Per-waiter wake primitives for the fair queue.
 *
 * # Architecture
 *
 * Every blocked consumer owns one `Notification`. Producers signal exactly the
 * consumer entitled to the next item instead of broadcasting to everyone, so a
 * hand-off wakes one thread and no thundering herd re-checks the queue.
 *
 * All notifications wait against the queue's single `parking_lot::Mutex`, which
 * is released for the duration of the wait and reacquired on wake.
 */

mod notify;
mod types;

pub use notify::Notification;
pub use types::WakeResult;
