//! Property tests for the allocation engine invariants.
//!
//! Run with: `cargo test -p box-office-core --test allocation_properties_test`

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use box_office_core::{
    AllocationEngine, AllocationEnvironment, InitialCapacity, TicketClass, TransactionStatus,
};
use box_office_testing::properties::{
    arb_class, arb_commands, arb_initial_capacity, arb_name,
};
use box_office_testing::{test_clock, InMemoryTransactionLog};
use proptest::prelude::*;
use std::sync::Arc;

fn engine(initial: InitialCapacity) -> (AllocationEngine, InMemoryTransactionLog) {
    let log = InMemoryTransactionLog::new();
    let env = AllocationEnvironment::new(Arc::new(test_clock()), Arc::new(log.clone()));
    (AllocationEngine::new(initial, env).unwrap(), log)
}

/// Rows of `class` with `status`
fn rows(log: &InMemoryTransactionLog, class: TicketClass, status: TransactionStatus) -> usize {
    log.snapshot()
        .iter()
        .filter(|r| r.ticket_type.class() == Some(class) && r.status == status)
        .count()
}

proptest! {
    #[test]
    fn capacity_stays_within_bounds(
        initial in arb_initial_capacity(5),
        commands in arb_commands(40),
    ) {
        let (mut engine, _log) = engine(initial);

        for command in commands {
            let _ = engine.execute(command);
            for class in TicketClass::ALL {
                prop_assert!(engine.remaining(class) <= initial.of(class));
            }
        }
    }

    #[test]
    fn counters_reconcile_with_log(
        initial in arb_initial_capacity(5),
        commands in arb_commands(40),
    ) {
        let (mut engine, _log) = engine(initial);

        for command in commands {
            let _ = engine.execute(command);
        }

        let summary = engine.summary().unwrap();
        prop_assert!(summary.is_reconciled(), "summary diverged: {:?}", summary);
    }

    #[test]
    fn queue_depth_matches_log(
        initial in arb_initial_capacity(5),
        commands in arb_commands(40),
    ) {
        let (mut engine, log) = engine(initial);

        for command in commands {
            let _ = engine.execute(command);
        }

        for class in TicketClass::ALL {
            let queued = rows(&log, class, TransactionStatus::Pending);
            let left = rows(&log, class, TransactionStatus::Confirmed)
                + rows(&log, class, TransactionStatus::Cancelled);
            prop_assert_eq!(engine.queue(class).len(), queued - left);
        }
    }

    #[test]
    fn cancellation_preserves_relative_order(
        names in proptest::collection::vec(arb_name(), 1..20),
        pick in any::<prop::sample::Index>(),
        class in arb_class(),
    ) {
        let (mut engine, _log) = engine(InitialCapacity::new(100, 100));
        for name in &names {
            engine.register(name, class, 1).unwrap();
        }
        let target = &names[pick.index(names.len())];
        let first = names.iter().position(|name| name == target).unwrap();
        let mut expected = names.clone();
        expected.remove(first);

        let outcome = engine.cancel(target, class, 1).unwrap();

        prop_assert_eq!(outcome.cancelled(), 1);
        prop_assert_eq!(engine.queue_snapshot(class), expected);
    }

    #[test]
    fn priority_is_confirmed_before_standard(
        initial in arb_initial_capacity(5),
        priority in proptest::collection::vec(arb_name(), 1..6),
        standard in proptest::collection::vec(arb_name(), 1..6),
    ) {
        let (mut engine, _log) = engine(initial);
        for name in &priority {
            let _ = engine.register(name, TicketClass::Priority, 1);
        }
        for name in &standard {
            let _ = engine.register(name, TicketClass::Standard, 1);
        }

        let confirmed = engine.process_tickets().unwrap();

        prop_assert!(confirmed.windows(2).all(|pair| pair[0].class <= pair[1].class));
    }

    #[test]
    fn second_drain_confirms_nothing(
        initial in arb_initial_capacity(5),
        commands in arb_commands(30),
    ) {
        let (mut engine, log) = engine(initial);
        for command in commands {
            let _ = engine.execute(command);
        }

        engine.process_tickets().unwrap();
        let rows_after_first = log.len();

        prop_assert!(engine.process_tickets().unwrap().is_empty());
        prop_assert_eq!(log.len(), rows_after_first);
    }

    #[test]
    fn rejected_registration_leaves_queue_untouched(
        name in arb_name(),
        class in arb_class(),
        available in 0u32..4,
        extra in 1u32..4,
    ) {
        let (mut engine, _log) = engine(InitialCapacity::new(available, available));

        let result = engine.register(&name, class, available + extra);

        prop_assert!(result.is_err());
        prop_assert!(engine.queue(class).is_empty());
        prop_assert_eq!(engine.remaining(class).value(), available);
    }
}

