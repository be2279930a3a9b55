//! Error types for the allocation engine

use crate::types::TicketClass;
use thiserror::Error;

/// Errors raised by [`TicketQueue`](crate::queue::TicketQueue)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Dequeue attempted on an empty queue
    #[error("Queue is empty")]
    Empty,
}

/// Errors raised by a [`TransactionLog`](crate::log::TransactionLog) sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// The sink could not be created or truncated
    #[error("Failed to initialize transaction log: {0}")]
    Initialize(String),

    /// A record could not be appended
    #[error("Failed to write transaction record: {0}")]
    Write(String),

    /// The log could not be read back
    #[error("Failed to read transaction log: {0}")]
    Read(String),

    /// A stored row could not be parsed
    #[error("Malformed transaction record on line {line}: {reason}")]
    Malformed {
        /// 1-indexed line in the underlying store (header is line 1)
        line: u64,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors returned by [`AllocationEngine`](crate::engine::AllocationEngine) operations
///
/// None of these are fatal: the engine state is never changed beyond what the
/// transaction log already shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Requester name was empty or whitespace
    #[error("Name cannot be empty")]
    EmptyName,

    /// Requested count was zero
    #[error("Number of tickets must be at least 1")]
    InvalidCount,

    /// Label did not name a ticket class
    #[error("Invalid ticket type: {0:?}")]
    InvalidClass(String),

    /// The class has no remaining capacity
    #[error("No {class} tickets available")]
    CapacityUnavailable {
        /// Class that is sold out
        class: TicketClass,
    },

    /// More units requested than the class has left
    #[error(
        "Number of tickets exceeds available {class} tickets. There are {available} tickets available."
    )]
    CountExceedsCapacity {
        /// Class requested
        class: TicketClass,
        /// Units requested
        requested: u32,
        /// Capacity counter at the time of the call
        available: u32,
    },

    /// Internal queue precondition violated
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The transaction log rejected a write or read
    #[error(transparent)]
    Log(#[from] LogError),
}
