/*!
 * Queue Module
 * Fair blocking FIFO queue
 *
 * - `items`: sequence-indexed item store
 * - `waiters`: blocked consumers in arrival order
 * - `operations` / `lifecycle`: the public facade, coordinating both under
 *   one lock
 */

pub mod config;
mod fair;
mod items;
mod lifecycle;
mod operations;
pub mod stats;
mod waiters;

// Re-export public API
pub use config::QueueConfig;
pub use fair::FairQueue;
pub use items::SequenceIndex;
pub use stats::QueueStats;
