//! The allocation engine.
//!
//! Owns one capacity counter and one wait queue per ticket class and performs
//! the three state-changing operations: register, process and cancel.
//!
//! Every operation follows the same shape: validate the command, build an
//! [`AllocationEvent`] per unit, write its record to the transaction log and
//! only then apply it to state. A failed log write therefore stops the
//! operation with the state matching what the log shows.
//!
//! ```text
//! register ──► Pending entries ──► process_tickets ──► Confirmed (counter - 1)
//!                     │
//!                     └──────────► cancel ───────────► Cancelled
//! ```

use crate::command::{Command, Outcome};
use crate::environment::AllocationEnvironment;
use crate::error::{AllocationError, QueueError};
use crate::metrics;
use crate::queue::TicketQueue;
use crate::summary::{Availability, SalesSummary};
use crate::types::{
    Allocation, Capacity, InitialCapacity, QueuePosition, TicketClass, TicketLabel,
    TransactionRecord, TransactionStatus,
};
use chrono::{DateTime, Utc};
use smallvec::SmallVec;

// ============================================================================
// State
// ============================================================================

/// Capacity counter and wait queue of one class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassPool {
    initial: Capacity,
    remaining: Capacity,
    queue: TicketQueue,
}

impl ClassPool {
    /// Creates a pool with a full counter and an empty queue
    #[must_use]
    pub const fn new(initial: Capacity) -> Self {
        Self {
            initial,
            remaining: initial,
            queue: TicketQueue::new(),
        }
    }

    /// Capacity the pool started with
    #[must_use]
    pub const fn initial(&self) -> Capacity {
        self.initial
    }

    /// Units still confirmable
    #[must_use]
    pub const fn remaining(&self) -> Capacity {
        self.remaining
    }

    /// Units confirmed so far (`initial - remaining`)
    #[must_use]
    pub const fn sold(&self) -> u32 {
        self.initial.0 - self.remaining.0
    }

    /// Pending entries
    #[must_use]
    pub const fn queue(&self) -> &TicketQueue {
        &self.queue
    }
}

/// State of both classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationState {
    priority: ClassPool,
    standard: ClassPool,
}

impl AllocationState {
    /// Creates state with full counters and empty queues
    #[must_use]
    pub const fn new(initial: InitialCapacity) -> Self {
        Self {
            priority: ClassPool::new(initial.priority),
            standard: ClassPool::new(initial.standard),
        }
    }

    /// Pool of one class
    #[must_use]
    pub const fn pool(&self, class: TicketClass) -> &ClassPool {
        match class {
            TicketClass::Priority => &self.priority,
            TicketClass::Standard => &self.standard,
        }
    }

    const fn pool_mut(&mut self, class: TicketClass) -> &mut ClassPool {
        match class {
            TicketClass::Priority => &mut self.priority,
            TicketClass::Standard => &mut self.standard,
        }
    }

    /// Initial capacities of both classes
    #[must_use]
    pub const fn initial_capacity(&self) -> InitialCapacity {
        InitialCapacity {
            priority: self.priority.initial,
            standard: self.standard.initial,
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// A single state transition. Each one becomes exactly one log record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocationEvent {
    /// One unit was queued
    TicketQueued {
        /// Requester
        name: String,
        /// Queue it joined
        class: TicketClass,
        /// When it was queued
        at: DateTime<Utc>,
    },

    /// The front entry of a class was allocated a unit
    TicketConfirmed {
        /// Requester
        name: String,
        /// Class allocated
        class: TicketClass,
        /// When it was confirmed
        at: DateTime<Utc>,
    },

    /// The first entry of `name` was removed from a queue
    TicketCancelled {
        /// Requester
        name: String,
        /// Queue it left
        class: TicketClass,
        /// When it was cancelled
        at: DateTime<Utc>,
    },

    /// A registration was refused after input validation
    RegistrationRejected {
        /// Requester
        name: String,
        /// Class, or the unrecognized label
        ticket_type: TicketLabel,
        /// `SoldOut` or `Invalid`
        status: TransactionStatus,
        /// When it was refused
        at: DateTime<Utc>,
    },
}

impl AllocationEvent {
    /// The log row for this event
    #[must_use]
    pub fn to_record(&self) -> TransactionRecord {
        match self {
            Self::TicketQueued { name, class, at } => {
                TransactionRecord::new(*at, name.as_str(), *class, TransactionStatus::Pending)
            }
            Self::TicketConfirmed { name, class, at } => {
                TransactionRecord::new(*at, name.as_str(), *class, TransactionStatus::Confirmed)
            }
            Self::TicketCancelled { name, class, at } => {
                TransactionRecord::new(*at, name.as_str(), *class, TransactionStatus::Cancelled)
            }
            Self::RegistrationRejected {
                name,
                ticket_type,
                status,
                at,
            } => TransactionRecord::new(*at, name.as_str(), ticket_type.clone(), *status),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Accepted registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// Requester, trimmed
    pub name: String,
    /// Queue joined
    pub class: TicketClass,
    /// 1-indexed queue position of each queued unit
    pub positions: SmallVec<[QueuePosition; 4]>,
}

/// Result of a cancellation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// At least one entry was removed
    Cancelled {
        /// Queue the entries left
        class: TicketClass,
        /// Entries actually removed
        cancelled: u32,
        /// Entries asked for
        requested: u32,
    },
    /// The requester had no entries in the queue
    NotFound {
        /// Queue searched
        class: TicketClass,
    },
}

impl CancelOutcome {
    /// Entries actually removed
    #[must_use]
    pub const fn cancelled(&self) -> u32 {
        match self {
            Self::Cancelled { cancelled, .. } => *cancelled,
            Self::NotFound { .. } => 0,
        }
    }

    /// Whether fewer entries were removed than requested
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        match self {
            Self::Cancelled {
                cancelled,
                requested,
                ..
            } => *cancelled < *requested,
            Self::NotFound { .. } => true,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Allocates two fixed pools of tickets to requesters through ordered queues.
///
/// # Example
///
/// ```
/// use box_office_core::{AllocationEngine, AllocationEnvironment, InitialCapacity, TicketClass};
/// # use box_office_core::{environment::SystemClock, log::TransactionLog, LogError, TransactionRecord};
/// # use std::sync::{Arc, Mutex};
/// # #[derive(Default)]
/// # struct VecLog(Mutex<Vec<TransactionRecord>>);
/// # impl TransactionLog for VecLog {
/// #     fn initialize(&self) -> Result<(), LogError> { Ok(()) }
/// #     fn record(&self, r: &TransactionRecord) -> Result<(), LogError> {
/// #         self.0.lock().map_err(|e| LogError::Write(e.to_string()))?.push(r.clone());
/// #         Ok(())
/// #     }
/// #     fn records(&self) -> Result<Vec<TransactionRecord>, LogError> {
/// #         Ok(self.0.lock().map_err(|e| LogError::Read(e.to_string()))?.clone())
/// #     }
/// # }
/// # fn main() -> Result<(), box_office_core::AllocationError> {
/// let env = AllocationEnvironment::new(Arc::new(SystemClock), Arc::new(VecLog::default()));
/// let mut engine = AllocationEngine::new(InitialCapacity::new(2, 2), env)?;
///
/// engine.register("Alice", TicketClass::Priority, 2)?;
/// engine.register("Bob", TicketClass::Standard, 1)?;
///
/// let confirmed = engine.process_tickets()?;
/// assert_eq!(confirmed.len(), 3);
/// assert_eq!(engine.remaining(TicketClass::Priority).value(), 0);
/// assert_eq!(engine.remaining(TicketClass::Standard).value(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AllocationEngine {
    state: AllocationState,
    env: AllocationEnvironment,
}

impl AllocationEngine {
    /// Creates an engine with full counters and empty queues.
    ///
    /// Initializes the transaction log, discarding anything it held before.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Log`] if the log cannot be initialized.
    pub fn new(
        initial: InitialCapacity,
        env: AllocationEnvironment,
    ) -> Result<Self, AllocationError> {
        env.log.initialize()?;

        let engine = Self {
            state: AllocationState::new(initial),
            env,
        };
        for class in TicketClass::ALL {
            engine.publish_gauges(class);
        }

        tracing::info!(
            priority = initial.priority.value(),
            standard = initial.standard.value(),
            "Allocation engine initialized"
        );
        Ok(engine)
    }

    // ========== Commands ==========

    /// Queues `count` units of `class` for `name`.
    ///
    /// Capacity is checked once, against the current counter: a class at zero
    /// is sold out, and a count above the counter is refused outright. Entries
    /// already waiting are not subtracted, so several small registrations may
    /// together queue more units than remain; the extra entries wait.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::EmptyName`] / [`AllocationError::InvalidCount`]: nothing logged
    /// - [`AllocationError::CapacityUnavailable`]: one `Sold Out` record logged
    /// - [`AllocationError::CountExceedsCapacity`]: one `Invalid` record logged
    /// - [`AllocationError::Log`]: the log refused a write
    #[tracing::instrument(skip(self))]
    pub fn register(
        &mut self,
        name: &str,
        class: TicketClass,
        count: u32,
    ) -> Result<Registration, AllocationError> {
        let name = Self::validate_request(name, count)?;
        let available = self.state.pool(class).remaining();

        if available.is_exhausted() {
            tracing::warn!(name, %class, "Registration refused: sold out");
            self.reject(name, class.into(), TransactionStatus::SoldOut)?;
            return Err(AllocationError::CapacityUnavailable { class });
        }

        if count > available.value() {
            tracing::warn!(
                name,
                %class,
                requested = count,
                available = available.value(),
                "Registration refused: count exceeds capacity"
            );
            self.reject(name, class.into(), TransactionStatus::Invalid)?;
            return Err(AllocationError::CountExceedsCapacity {
                class,
                requested: count,
                available: available.value(),
            });
        }

        let mut positions = SmallVec::new();
        for _ in 0..count {
            self.commit(AllocationEvent::TicketQueued {
                name: name.to_string(),
                class,
                at: self.env.clock.now(),
            })?;
            positions.push(QueuePosition(self.state.pool(class).queue().len()));
        }

        tracing::info!(name, %class, count, "Registration accepted");
        Ok(Registration {
            name: name.to_string(),
            class,
            positions,
        })
    }

    /// Like [`register`](Self::register), but takes the class as a raw label.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::InvalidClass`] after logging one `Invalid`
    /// record carrying the raw label if it names no class; otherwise the
    /// errors of [`register`](Self::register).
    #[tracing::instrument(skip(self))]
    pub fn register_labeled(
        &mut self,
        name: &str,
        label: &str,
        count: u32,
    ) -> Result<Registration, AllocationError> {
        let trimmed = Self::validate_request(name, count)?;

        match TicketLabel::parse(label) {
            TicketLabel::Class(class) => self.register(trimmed, class, count),
            unrecognized @ TicketLabel::Unrecognized(_) => {
                tracing::warn!(name = trimmed, label, "Registration refused: invalid ticket type");
                self.reject(trimmed, unrecognized, TransactionStatus::Invalid)?;
                Err(AllocationError::InvalidClass(label.to_string()))
            }
        }
    }

    /// Confirms queued entries while capacity lasts.
    ///
    /// The priority queue is drained before the standard queue is touched.
    /// Within a class, entries are confirmed front to back until the queue
    /// empties or the counter reaches zero; the rest stay pending. With
    /// nothing confirmable this returns an empty list and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Log`] if a record cannot be written; the
    /// allocations confirmed before the failure stand.
    #[tracing::instrument(skip(self))]
    pub fn process_tickets(&mut self) -> Result<Vec<Allocation>, AllocationError> {
        let mut confirmed = Vec::new();

        for class in TicketClass::ALL {
            loop {
                let pool = self.state.pool(class);
                if pool.queue().is_empty() || pool.remaining().is_exhausted() {
                    break;
                }
                let name = pool.queue().front().ok_or(QueueError::Empty)?.to_string();

                self.commit(AllocationEvent::TicketConfirmed {
                    name: name.clone(),
                    class,
                    at: self.env.clock.now(),
                })?;
                tracing::debug!(name, %class, "Ticket confirmed");
                confirmed.push(Allocation { name, class });
            }
        }

        if !confirmed.is_empty() {
            tracing::info!(confirmed = confirmed.len(), "Processed ticket requests");
        }
        Ok(confirmed)
    }

    /// Removes up to `count` of `name`'s entries from a class queue.
    ///
    /// Each pass removes the first entry of `name` found anywhere in the
    /// queue, leaving every other entry in its relative order, and stops at
    /// the first pass that finds none. Cost is O(count × queue length).
    ///
    /// Pending entries hold no capacity, so the counter is left as it is:
    /// `initial - remaining` keeps matching the confirmed rows in the log.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::EmptyName`] / [`AllocationError::InvalidCount`]: nothing logged
    /// - [`AllocationError::Log`]: the log refused a write; removals before it stand
    #[tracing::instrument(skip(self))]
    pub fn cancel(
        &mut self,
        name: &str,
        class: TicketClass,
        count: u32,
    ) -> Result<CancelOutcome, AllocationError> {
        let name = Self::validate_request(name, count)?;
        let mut cancelled = 0;

        for _ in 0..count {
            if !self.state.pool(class).queue().iter().any(|entry| entry == name) {
                break;
            }
            self.commit(AllocationEvent::TicketCancelled {
                name: name.to_string(),
                class,
                at: self.env.clock.now(),
            })?;
            cancelled += 1;
        }

        if cancelled == 0 {
            tracing::warn!(name, %class, "Cancellation found no queued tickets");
            return Ok(CancelOutcome::NotFound { class });
        }

        tracing::info!(name, %class, cancelled, requested = count, "Tickets cancelled");
        Ok(CancelOutcome::Cancelled {
            class,
            cancelled,
            requested: count,
        })
    }

    /// Runs one command of the command surface.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, AllocationError> {
        match command {
            Command::Register { name, class, count } => {
                self.register(&name, class, count).map(Outcome::Registered)
            }
            Command::CheckAvailability => Ok(Outcome::Availability(self.availability())),
            Command::Process => self.process_tickets().map(Outcome::Processed),
            Command::Cancel { name, class, count } => {
                self.cancel(&name, class, count).map(Outcome::Cancelled)
            }
            Command::ViewSummary => self.summary().map(Outcome::Summary),
        }
    }

    // ========== Queries ==========

    /// Remaining units of both classes
    #[must_use]
    pub const fn availability(&self) -> Availability {
        Availability {
            priority: self.state.priority.remaining,
            standard: self.state.standard.remaining,
        }
    }

    /// Remaining units of one class
    #[must_use]
    pub const fn remaining(&self, class: TicketClass) -> Capacity {
        self.state.pool(class).remaining()
    }

    /// Initial capacities
    #[must_use]
    pub const fn initial_capacity(&self) -> InitialCapacity {
        self.state.initial_capacity()
    }

    /// Pending entries of one class
    #[must_use]
    pub const fn queue(&self, class: TicketClass) -> &TicketQueue {
        self.state.pool(class).queue()
    }

    /// Names waiting in one class queue, front first
    #[must_use]
    pub fn queue_snapshot(&self, class: TicketClass) -> Vec<String> {
        self.queue(class).iter().map(str::to_string).collect()
    }

    /// Sales summary, reconciled against the transaction log.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::Log`] if the log cannot be read back.
    pub fn summary(&self) -> Result<SalesSummary, AllocationError> {
        let records = self.env.log.records()?;
        let summary = SalesSummary::reconcile(&self.state, &records);

        if !summary.is_reconciled() {
            tracing::warn!(
                priority_sold = summary.priority.sold,
                priority_confirmed = summary.priority.confirmed_in_log,
                standard_sold = summary.standard.sold,
                standard_confirmed = summary.standard.confirmed_in_log,
                "Counters disagree with the transaction log"
            );
        }
        Ok(summary)
    }

    // ========== Internals ==========

    /// Checks the input preconditions shared by register and cancel
    fn validate_request(name: &str, count: u32) -> Result<&str, AllocationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AllocationError::EmptyName);
        }
        if count == 0 {
            return Err(AllocationError::InvalidCount);
        }
        Ok(name)
    }

    fn reject(
        &mut self,
        name: &str,
        ticket_type: TicketLabel,
        status: TransactionStatus,
    ) -> Result<(), AllocationError> {
        self.commit(AllocationEvent::RegistrationRejected {
            name: name.to_string(),
            ticket_type,
            status,
            at: self.env.clock.now(),
        })
    }

    /// Logs an event, then applies it
    fn commit(&mut self, event: AllocationEvent) -> Result<(), AllocationError> {
        let record = event.to_record();
        self.env.log.record(&record)?;
        metrics::record_transaction(&record.ticket_type, record.status);

        Self::apply_event(&mut self.state, &event)?;
        if let Some(class) = record.ticket_type.class() {
            self.publish_gauges(class);
        }
        Ok(())
    }

    /// Applies an event to state
    fn apply_event(state: &mut AllocationState, event: &AllocationEvent) -> Result<(), QueueError> {
        match event {
            AllocationEvent::TicketQueued { name, class, .. } => {
                state.pool_mut(*class).queue.enqueue(name.as_str());
            }
            AllocationEvent::TicketConfirmed { class, .. } => {
                let pool = state.pool_mut(*class);
                pool.queue.dequeue_front()?;
                pool.remaining = Capacity(pool.remaining.0.saturating_sub(1));
            }
            AllocationEvent::TicketCancelled { name, class, .. } => {
                state
                    .pool_mut(*class)
                    .queue
                    .remove_first_match(|entry| entry == name)
                    .ok_or(QueueError::Empty)?;
            }
            // Rejections are audit-only
            AllocationEvent::RegistrationRejected { .. } => {}
        }
        Ok(())
    }

    fn publish_gauges(&self, class: TicketClass) {
        let pool = self.state.pool(class);
        metrics::update_class_gauges(class.label(), pool.remaining().value(), pool.queue().len());
    }
}
