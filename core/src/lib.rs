//! # Box Office Core
//!
//! Allocation engine for a fixed pool of priority (VIP) and standard
//! (Regular) tickets.
//!
//! ## Core Concepts
//!
//! - **Ticket class**: one of two fixed tiers, each with its own capacity
//!   counter and wait queue
//! - **Register**: queue one pending entry per requested unit
//! - **Process**: confirm entries front to back, priority queue first, while
//!   capacity lasts
//! - **Cancel**: remove a requester's entries from anywhere in a queue,
//!   keeping everyone else's order
//! - **Transaction log**: append-only record of every transition, injected
//!   via [`AllocationEnvironment`]
//!
//! ## Invariants
//!
//! - `0 <= remaining <= initial` for both classes
//! - An entry is confirmed or cancelled at most once
//! - `initial - remaining` equals the `Confirmed` rows of the class in the log
//!
//! ## Example
//!
//! ```ignore
//! use box_office_core::*;
//!
//! let env = AllocationEnvironment::new(Arc::new(SystemClock), Arc::new(log));
//! let mut engine = AllocationEngine::new(InitialCapacity::new(50, 100), env)?;
//!
//! engine.register("Alice", TicketClass::Priority, 2)?;
//! for allocation in engine.process_tickets()? {
//!     println!("{allocation}");
//! }
//! ```

pub mod command;
pub mod engine;
pub mod environment;
pub mod error;
pub mod log;
pub mod metrics;
pub mod queue;
pub mod summary;
pub mod types;

pub use command::{Command, Outcome};
pub use engine::{
    AllocationEngine, AllocationEvent, AllocationState, CancelOutcome, ClassPool, Registration,
};
pub use environment::{AllocationEnvironment, Clock, SystemClock};
pub use error::{AllocationError, LogError, QueueError};
pub use log::{TransactionLog, LOG_HEADER};
pub use queue::TicketQueue;
pub use summary::{Availability, ClassSummary, SalesSummary};
pub use types::{
    Allocation, Capacity, InitialCapacity, QueuePosition, TicketClass, TicketLabel,
    TransactionRecord, TransactionStatus,
};

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
