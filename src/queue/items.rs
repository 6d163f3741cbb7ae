/*!
 * Item Queue
 * Ordered item storage with monotonically increasing sequence indices
 */

use crate::core::errors::EnqueueError;
use std::collections::VecDeque;

/// Sequence index assigned to every enqueued item
pub type SequenceIndex = u64;

/// Enqueued payload tagged with its sequence index
#[derive(Debug)]
pub(crate) struct Item<T> {
    pub sequence_index: SequenceIndex,
    pub payload: T,
}

impl<T> Item<T> {
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// FIFO item store
///
/// Not synchronized: every caller holds the queue lock. Items leave strictly
/// from the front, so the front item's index always equals `processed`.
#[derive(Debug)]
pub(crate) struct ItemQueue<T> {
    items: VecDeque<Item<T>>,
    enqueued: u64,
    processed: u64,
}

impl<T> ItemQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            enqueued: 0,
            processed: 0,
        }
    }

    /// Append an item, returning its sequence index
    ///
    /// Growth is checked so allocation failure reaches the caller as an
    /// error, together with the payload.
    pub fn append(&mut self, payload: T) -> Result<SequenceIndex, EnqueueError<T>> {
        if let Err(e) = self.items.try_reserve(1) {
            return Err(EnqueueError::new(e.into(), payload));
        }

        let sequence_index = self.enqueued;
        self.items.push_back(Item {
            sequence_index,
            payload,
        });
        self.enqueued += 1;
        Ok(sequence_index)
    }

    pub fn pop_front(&mut self) -> Option<Item<T>> {
        let item = self.items.pop_front()?;
        self.processed += 1;
        debug_assert_eq!(item.sequence_index + 1, self.processed);
        Some(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sequence index of the next item to leave the queue
    pub fn front_index(&self) -> Option<SequenceIndex> {
        self.items.front().map(|item| item.sequence_index)
    }

    /// Total items ever appended (since the last drain)
    pub fn enqueued(&self) -> u64 {
        self.enqueued
    }

    /// Total items ever removed (since the last drain)
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Remove every item and reset both counters to zero
    pub fn drain(&mut self) -> Vec<T> {
        let drained = self.items.drain(..).map(Item::into_payload).collect();
        self.enqueued = 0;
        self.processed = 0;
        drained
    }
}
