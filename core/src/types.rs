//! Domain types for the box office.
//!
//! Ticket classes, capacity counters, queue positions and the rows of the
//! transaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Ticket Class
// ============================================================================

/// The two fixed ticket tiers, each with its own capacity and queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketClass {
    /// Served first by `process_tickets` (displayed as "VIP")
    Priority,
    /// Served once the priority queue is drained (displayed as "Regular")
    Standard,
}

impl TicketClass {
    /// All classes in processing order.
    pub const ALL: [Self; 2] = [Self::Priority, Self::Standard];

    /// Display label written to the transaction log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Priority => "VIP",
            Self::Standard => "Regular",
        }
    }

    /// Parses a user- or log-supplied label.
    ///
    /// Accepts the short menu codes (`V`, `R`), the display labels and the
    /// class names, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if ["v", "vip", "priority"]
            .iter()
            .any(|candidate| label.eq_ignore_ascii_case(candidate))
        {
            Some(Self::Priority)
        } else if ["r", "regular", "standard"]
            .iter()
            .any(|candidate| label.eq_ignore_ascii_case(candidate))
        {
            Some(Self::Standard)
        } else {
            None
        }
    }
}

impl fmt::Display for TicketClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TicketClass {
    type Err = crate::error::AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| crate::error::AllocationError::InvalidClass(s.to_string()))
    }
}

// ============================================================================
// Capacity and Positions
// ============================================================================

/// Remaining confirmable units for a class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(pub u32);

impl Capacity {
    /// Creates a new `Capacity`
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the capacity value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Whether no units remain
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-indexed position of an entry in its class queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QueuePosition(pub usize);

impl QueuePosition {
    /// Returns the position value
    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }

    /// Position shifted by a presentation bias (the menu shows `1000 + n`).
    #[must_use]
    pub const fn with_offset(&self, offset: usize) -> usize {
        self.0 + offset
    }
}

impl fmt::Display for QueuePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initial capacities of both classes, fixed for the lifetime of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialCapacity {
    /// Priority (VIP) units
    pub priority: Capacity,
    /// Standard (Regular) units
    pub standard: Capacity,
}

impl InitialCapacity {
    /// Creates a new `InitialCapacity`
    #[must_use]
    pub const fn new(priority: u32, standard: u32) -> Self {
        Self {
            priority: Capacity::new(priority),
            standard: Capacity::new(standard),
        }
    }

    /// Initial capacity of one class
    #[must_use]
    pub const fn of(&self, class: TicketClass) -> Capacity {
        match class {
            TicketClass::Priority => self.priority,
            TicketClass::Standard => self.standard,
        }
    }

    /// Sum over both classes
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.priority.0 + self.standard.0
    }
}

// ============================================================================
// Transaction Log Rows
// ============================================================================

/// Status column of a transaction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Entry queued, awaiting processing
    Pending,
    /// Entry allocated a unit of capacity
    Confirmed,
    /// Entry removed from its queue by the requester
    Cancelled,
    /// Registration refused because the class had no capacity left
    SoldOut,
    /// Registration refused for an unknown class or an oversized count
    Invalid,
}

impl TransactionStatus {
    /// Label written to the status column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::SoldOut => "Sold Out",
            Self::Invalid => "Invalid",
        }
    }

    /// Parses a status column value.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Cancelled" => Some(Self::Cancelled),
            "Sold Out" => Some(Self::SoldOut),
            // older logs wrote "Invalid Type"
            "Invalid" | "Invalid Type" => Some(Self::Invalid),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket-type column of a transaction record.
///
/// Unknown labels are kept verbatim so rejected registrations can still be
/// audited.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketLabel {
    /// One of the two fixed classes
    Class(TicketClass),
    /// A label that matched no class
    Unrecognized(String),
}

impl TicketLabel {
    /// Parses a label, keeping it verbatim when it names no class.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        TicketClass::from_label(label)
            .map_or_else(|| Self::Unrecognized(label.to_string()), Self::Class)
    }

    /// The class, if the label named one
    #[must_use]
    pub const fn class(&self) -> Option<TicketClass> {
        match self {
            Self::Class(class) => Some(*class),
            Self::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for TicketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.write_str(class.label()),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<TicketClass> for TicketLabel {
    fn from(class: TicketClass) -> Self {
        Self::Class(class)
    }
}

/// One immutable row of the transaction log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
    /// Requester name
    pub name: String,
    /// Ticket class (or the rejected raw label)
    pub ticket_type: TicketLabel,
    /// Transition recorded
    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// Timestamp format of the log's first column.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Creates a new `TransactionRecord`
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        name: impl Into<String>,
        ticket_type: impl Into<TicketLabel>,
        status: TransactionStatus,
    ) -> Self {
        Self {
            timestamp,
            name: name.into(),
            ticket_type: ticket_type.into(),
            status,
        }
    }

    /// Whether this row confirms a unit of `class`
    #[must_use]
    pub fn confirms(&self, class: TicketClass) -> bool {
        self.status == TransactionStatus::Confirmed && self.ticket_type.class() == Some(class)
    }

    /// Timestamp rendered the way the log stores it
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(Self::TIMESTAMP_FORMAT).to_string()
    }
}

/// A confirmed allocation returned by `process_tickets`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Requester who received the unit
    pub name: String,
    /// Class of the unit
    pub class: TicketClass,
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.class)
    }
}
