/*!
 * Queue Limits and Constants
 *
 * Default sizes used when a queue is created without explicit configuration.
 * None of these bound the queue: both collections grow on demand.
 */

/// Initial item slots reserved at creation
/// [PERF] Avoids early reallocations for bursty producers
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Initial waiter slots reserved at creation
/// A coordination primitive rarely has more blocked consumers than this
pub const DEFAULT_WAITER_CAPACITY: usize = 16;

/// Name attached to tracing events when none is configured
pub const DEFAULT_QUEUE_NAME: &str = "fair-queue";
