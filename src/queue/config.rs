/*!
 * Queue Configuration
 */

use crate::core::limits::{DEFAULT_INITIAL_CAPACITY, DEFAULT_QUEUE_NAME, DEFAULT_WAITER_CAPACITY};
use serde::{Deserialize, Serialize};

/// Queue configuration
///
/// Capacities are preallocation hints only; the queue never rejects a
/// producer for being full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Label attached to tracing events of this instance
    pub name: String,
    /// Item slots reserved up front
    pub initial_capacity: usize,
    /// Waiter slots reserved up front
    pub waiter_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            waiter_capacity: DEFAULT_WAITER_CAPACITY,
        }
    }
}

impl QueueConfig {
    /// Configuration for short-lived queues that should not preallocate
    pub fn minimal() -> Self {
        Self {
            initial_capacity: 0,
            waiter_capacity: 0,
            ..Default::default()
        }
    }

    /// Configuration for a work pool with many consumers
    pub fn worker_pool(workers: usize) -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY.max(workers * 4),
            waiter_capacity: workers,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_waiter_capacity(mut self, capacity: usize) -> Self {
        self.waiter_capacity = capacity;
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.name, DEFAULT_QUEUE_NAME);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.waiter_capacity, DEFAULT_WAITER_CAPACITY);
    }

    #[test]
    fn test_from_json_partial() {
        let config = QueueConfig::from_json(r#"{"name": "jobs", "waiter_capacity": 8}"#).unwrap();
        assert_eq!(
            config,
            QueueConfig::default().with_name("jobs").with_waiter_capacity(8)
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(QueueConfig::from_json(r#"{"initial_capacity": "lots"}"#).is_err());
    }

    #[test]
    fn test_worker_pool() {
        let config = QueueConfig::worker_pool(32);
        assert_eq!(config.waiter_capacity, 32);
        assert_eq!(config.initial_capacity, 128);
    }
}
