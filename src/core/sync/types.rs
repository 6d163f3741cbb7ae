/*!
 * Synchronization Types
 *
 * Shared result vocabulary for signalling operations.
 */

use serde::{Deserialize, Serialize};

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }

    /// Build from a raw count
    #[inline]
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            WakeResult::NoWaiters
        } else {
            WakeResult::Woken(count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_count() {
        assert_eq!(WakeResult::from_count(0), WakeResult::NoWaiters);
        assert_eq!(WakeResult::from_count(3), WakeResult::Woken(3));
        assert_eq!(WakeResult::from_count(3).count(), 3);
        assert!(!WakeResult::NoWaiters.is_woken());
    }
}
