//! Read-side reports: availability and the reconciled sales summary.
//!
//! Tickets sold are computed twice, once from the engine's counters
//! (`initial - remaining`) and once by counting `Confirmed` rows in the
//! transaction log. The two must agree; a divergence means a bug.

use crate::engine::AllocationState;
use crate::types::{Capacity, TicketClass, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remaining units of both classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Remaining priority (VIP) units
    pub priority: Capacity,
    /// Remaining standard (Regular) units
    pub standard: Capacity,
}

impl Availability {
    /// Remaining units of one class
    #[must_use]
    pub const fn of(&self, class: TicketClass) -> Capacity {
        match class {
            TicketClass::Priority => self.priority,
            TicketClass::Standard => self.standard,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Tickets: {}", TicketClass::Priority, self.priority)?;
        write!(f, "{} Tickets: {}", TicketClass::Standard, self.standard)
    }
}

/// Sales figures of one class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    /// Class described
    pub class: TicketClass,
    /// Capacity at start
    pub initial: Capacity,
    /// Capacity counter now
    pub remaining: Capacity,
    /// `initial - remaining`
    pub sold: u32,
    /// `Confirmed` rows of this class in the log
    pub confirmed_in_log: u32,
    /// Entries still waiting in the queue
    pub pending: usize,
}

impl ClassSummary {
    /// Builds the summary of `class` from live state and the log rows.
    #[must_use]
    pub fn from_state(
        class: TicketClass,
        state: &AllocationState,
        records: &[TransactionRecord],
    ) -> Self {
        let pool = state.pool(class);
        let confirmed = records.iter().filter(|record| record.confirms(class)).count();

        Self {
            class,
            initial: pool.initial(),
            remaining: pool.remaining(),
            sold: pool.sold(),
            confirmed_in_log: u32::try_from(confirmed).unwrap_or(u32::MAX),
            pending: pool.queue().len(),
        }
    }

    /// Whether counter and log agree on units sold
    #[must_use]
    pub const fn is_reconciled(&self) -> bool {
        self.sold == self.confirmed_in_log
    }
}

/// Sales summary of both classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Priority (VIP) figures
    pub priority: ClassSummary,
    /// Standard (Regular) figures
    pub standard: ClassSummary,
}

impl SalesSummary {
    /// Reconciles live state against the transaction log.
    #[must_use]
    pub fn reconcile(state: &AllocationState, records: &[TransactionRecord]) -> Self {
        Self {
            priority: ClassSummary::from_state(TicketClass::Priority, state, records),
            standard: ClassSummary::from_state(TicketClass::Standard, state, records),
        }
    }

    /// Figures of one class
    #[must_use]
    pub const fn of(&self, class: TicketClass) -> &ClassSummary {
        match class {
            TicketClass::Priority => &self.priority,
            TicketClass::Standard => &self.standard,
        }
    }

    /// Initial capacity over both classes
    #[must_use]
    pub const fn total_tickets(&self) -> u32 {
        self.priority.initial.0 + self.standard.initial.0
    }

    /// Units sold over both classes, by counter
    #[must_use]
    pub const fn tickets_sold(&self) -> u32 {
        self.priority.sold + self.standard.sold
    }

    /// Whether both classes reconcile
    #[must_use]
    pub const fn is_reconciled(&self) -> bool {
        self.priority.is_reconciled() && self.standard.is_reconciled()
    }
}

impl fmt::Display for SalesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Tickets: {}", self.total_tickets())?;
        writeln!(f, "Tickets Sold: {}", self.tickets_sold())?;
        for class in TicketClass::ALL {
            writeln!(f, "{class} Tickets Sold: {}", self.of(class).confirmed_in_log)?;
        }
        for class in TicketClass::ALL {
            writeln!(f, "{class} Tickets Remaining: {}", self.of(class).remaining)?;
        }
        for class in TicketClass::ALL {
            writeln!(f, "{class} Requests Pending: {}", self.of(class).pending)?;
        }
        if self.is_reconciled() {
            write!(f, "Ledger: reconciled")
        } else {
            write!(f, "Ledger: MISMATCH between counters and transaction log")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InitialCapacity, TransactionStatus};
    use chrono::{DateTime, Utc};

    fn confirmed(class: TicketClass) -> TransactionRecord {
        TransactionRecord::new(
            DateTime::<Utc>::UNIX_EPOCH,
            "Ann",
            class,
            TransactionStatus::Confirmed,
        )
    }

    #[test]
    fn fresh_state_reconciles_against_empty_log() {
        let state = AllocationState::new(InitialCapacity::new(5, 5));

        let summary = SalesSummary::reconcile(&state, &[]);

        assert_eq!(summary.total_tickets(), 10);
        assert_eq!(summary.tickets_sold(), 0);
        assert!(summary.is_reconciled());
    }

    #[test]
    fn stray_confirmed_row_is_a_mismatch() {
        let state = AllocationState::new(InitialCapacity::new(5, 5));

        let summary = SalesSummary::reconcile(&state, &[confirmed(TicketClass::Standard)]);

        assert!(summary.priority.is_reconciled());
        assert!(!summary.standard.is_reconciled());
        assert!(!summary.is_reconciled());
        assert!(summary.to_string().contains("MISMATCH"));
    }

    #[test]
    fn display_uses_class_labels() {
        let state = AllocationState::new(InitialCapacity::new(2, 3));

        let text = SalesSummary::reconcile(&state, &[]).to_string();

        assert!(text.contains("Total Tickets: 5"));
        assert!(text.contains("VIP Tickets Remaining: 2"));
        assert!(text.contains("Regular Tickets Remaining: 3"));
    }

    #[test]
    fn availability_displays_both_classes() {
        let availability = Availability {
            priority: Capacity(1),
            standard: Capacity(4),
        };

        assert_eq!(availability.to_string(), "VIP Tickets: 1\nRegular Tickets: 4");
        assert_eq!(availability.of(TicketClass::Standard), Capacity(4));
    }
}
