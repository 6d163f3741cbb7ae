/*!
 * Fair Queue Library
 * Unbounded blocking FIFO queue that hands items to blocked consumers
 * in the order they started waiting
 */

pub mod core;
pub mod monitoring;
pub mod queue;

// Re-exports
pub use crate::core::errors::{EnqueueError, QueueError, QueueResult};
pub use crate::core::sync::{Notification, WakeResult};
pub use monitoring::init_tracing;
pub use queue::{FairQueue, QueueConfig, QueueStats};
