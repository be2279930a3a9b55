//! Command surface of the engine.
//!
//! One variant per menu operation (exit excepted); [`AllocationEngine::execute`]
//! turns each into the matching engine call.
//!
//! [`AllocationEngine::execute`]: crate::engine::AllocationEngine::execute

use crate::engine::{CancelOutcome, Registration};
use crate::summary::{Availability, SalesSummary};
use crate::types::{Allocation, TicketClass};

/// A request against the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Queue `count` units for `name`
    Register {
        /// Requester
        name: String,
        /// Class requested
        class: TicketClass,
        /// Units requested
        count: u32,
    },

    /// Report remaining capacity of both classes
    CheckAvailability,

    /// Confirm queued entries while capacity lasts
    Process,

    /// Remove up to `count` of `name`'s queued entries
    Cancel {
        /// Requester
        name: String,
        /// Queue to search
        class: TicketClass,
        /// Units to cancel
        count: u32,
    },

    /// Report sales reconciled against the transaction log
    ViewSummary,
}

/// What a [`Command`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Result of [`Command::Register`]
    Registered(Registration),
    /// Result of [`Command::CheckAvailability`]
    Availability(Availability),
    /// Result of [`Command::Process`], in confirmation order
    Processed(Vec<Allocation>),
    /// Result of [`Command::Cancel`]
    Cancelled(CancelOutcome),
    /// Result of [`Command::ViewSummary`]
    Summary(SalesSummary),
}
