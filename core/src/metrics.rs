//! Business metrics for the allocation engine.
//!
//! Recorded through the `metrics` facade; without an installed recorder these
//! calls are no-ops.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `box_office_tickets_total{class, status}` - Transaction records by class and status
//!
//! ## Gauges
//! - `box_office_capacity_remaining{class}` - Current capacity counter
//! - `box_office_queue_depth{class}` - Pending entries in the class queue

use crate::types::{TicketLabel, TransactionStatus};
use metrics::{describe_counter, describe_gauge};

/// Register descriptions for all engine metrics.
///
/// Call once at startup, before the first operation.
pub fn register_metrics() {
    describe_counter!(
        "box_office_tickets_total",
        "Transaction records written, by ticket class and status"
    );
    describe_gauge!(
        "box_office_capacity_remaining",
        "Remaining confirmable units per ticket class"
    );
    describe_gauge!(
        "box_office_queue_depth",
        "Pending entries waiting in each ticket class queue"
    );

    tracing::info!("Box office metrics registered");
}

/// Count one transaction record.
pub fn record_transaction(ticket_type: &TicketLabel, status: TransactionStatus) {
    let class = match ticket_type {
        TicketLabel::Class(class) => class.label(),
        TicketLabel::Unrecognized(_) => "unrecognized",
    };
    metrics::counter!(
        "box_office_tickets_total",
        "class" => class,
        "status" => status.label()
    )
    .increment(1);
}

/// Publish the current counter and queue depth of a class.
#[allow(clippy::cast_precision_loss)] // Gauges are f64; queue depths never approach 2^52
pub fn update_class_gauges(class: &'static str, remaining: u32, queue_depth: usize) {
    metrics::gauge!("box_office_capacity_remaining", "class" => class).set(f64::from(remaining));
    metrics::gauge!("box_office_queue_depth", "class" => class).set(queue_depth as f64);
}
