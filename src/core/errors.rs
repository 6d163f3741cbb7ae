/*!
 * Error Types
 * Queue error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Queue is closed")]
    #[diagnostic(
        code(queue::closed),
        help("The queue was shut down. Create a new queue to continue handing off work.")
    )]
    Closed,

    #[error("Dequeue timed out after {0:?}")]
    #[diagnostic(
        code(queue::timeout),
        help("No item arrived for this consumer in time. Retry or use a longer timeout.")
    )]
    Timeout(Duration),

    #[error("Allocation failed: {0}")]
    #[diagnostic(
        code(queue::allocation_failed),
        help("The system may be low on memory. Drain the queue or free resources.")
    )]
    AllocationFailed(String),
}

impl QueueError {
    /// Whether the queue can no longer serve this caller
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed)
    }
}

impl From<std::collections::TryReserveError> for QueueError {
    fn from(err: std::collections::TryReserveError) -> Self {
        QueueError::AllocationFailed(err.to_string())
    }
}

/// Rejected enqueue; the item goes back to the caller
pub struct EnqueueError<T> {
    pub error: QueueError,
    pub item: T,
}

impl<T> EnqueueError<T> {
    pub fn new(error: QueueError, item: T) -> Self {
        Self { error, item }
    }

    pub fn is_closed(&self) -> bool {
        self.error.is_closed()
    }

    /// Recover the rejected item
    pub fn into_inner(self) -> T {
        self.item
    }

    pub fn into_parts(self) -> (QueueError, T) {
        (self.error, self.item)
    }
}

// No `T: Debug` bound, so `unwrap` works for any payload
impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnqueueError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enqueue rejected: {}", self.error)
    }
}

impl<T> std::error::Error for EnqueueError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> Diagnostic for EnqueueError<T> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error.help()
    }
}

impl<T> From<EnqueueError<T>> for QueueError {
    fn from(err: EnqueueError<T>) -> Self {
        err.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(QueueError::Closed.to_string(), "Queue is closed");
        assert_eq!(
            QueueError::Timeout(Duration::from_millis(5)).to_string(),
            "Dequeue timed out after 5ms"
        );
    }

    #[test]
    fn test_error_diagnostic_code() {
        let code = QueueError::Closed.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("queue::closed"));
    }

    #[test]
    fn test_error_serde_tagging() {
        let json = serde_json::to_string(&QueueError::AllocationFailed("oom".into())).unwrap();
        assert_eq!(json, r#"{"error_type":"allocation_failed","details":"oom"}"#);

        let back: QueueError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QueueError::AllocationFailed("oom".into()));
    }

    #[test]
    fn test_unit_variant_serde() {
        let json = serde_json::to_string(&QueueError::Closed).unwrap();
        assert_eq!(json, r#"{"error_type":"closed"}"#);
    }

    #[test]
    fn test_enqueue_error_returns_item() {
        let err = EnqueueError::new(QueueError::Closed, vec![1, 2]);
        assert!(err.is_closed());
        assert_eq!(err.to_string(), "Enqueue rejected: Queue is closed");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("queue::closed")
        );
        assert_eq!(err.into_parts(), (QueueError::Closed, vec![1, 2]));
    }

    #[test]
    fn test_enqueue_error_converts() {
        let err = EnqueueError::new(QueueError::AllocationFailed("oom".into()), ());
        assert_eq!(QueueError::from(err), QueueError::AllocationFailed("oom".into()));
    }
}
