//! Ordered wait queue for one ticket class.

use crate::error::QueueError;
use crate::types::QueuePosition;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// FIFO sequence of pending requester names.
///
/// Duplicates are allowed: a requester asking for three units occupies three
/// entries. The queue has no capacity bound of its own; the engine's capacity
/// counter gates confirmation, not enqueueing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketQueue {
    entries: VecDeque<String>,
}

impl TicketQueue {
    /// Creates an empty queue
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends an entry to the back and returns its 1-indexed position.
    pub fn enqueue(&mut self, name: impl Into<String>) -> QueuePosition {
        self.entries.push_back(name.into());
        QueuePosition(self.entries.len())
    }

    /// Removes and returns the front entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to dequeue.
    pub fn dequeue_front(&mut self) -> Result<String, QueueError> {
        self.entries.pop_front().ok_or(QueueError::Empty)
    }

    /// The entry that `dequeue_front` would return
    #[must_use]
    pub fn front(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Removes the first entry (front to back) matching `predicate`.
    ///
    /// Entries before the match keep their positions; entries after it move up
    /// by one and keep their relative order. A single call is O(n), so
    /// cancelling `k` units costs O(k × n).
    pub fn remove_first_match<P>(&mut self, mut predicate: P) -> Option<String>
    where
        P: FnMut(&str) -> bool,
    {
        let index = self.entries.iter().position(|entry| predicate(entry))?;
        self.entries.remove(index)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from front to back
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TicketQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}
