//! Property-based testing utilities
//!
//! proptest strategies for engine inputs. Names come from a small fixed pool
//! so generated sequences hit duplicates and mid-queue cancellations often.

use box_office_core::{Command, InitialCapacity, TicketClass};
use proptest::prelude::*;

/// Requester names used by [`arb_name`]
pub const NAMES: [&str; 5] = ["Alice", "Bob", "Carol", "Dave", "Eve"];

/// Either ticket class
pub fn arb_class() -> impl Strategy<Value = TicketClass> {
    prop_oneof![Just(TicketClass::Priority), Just(TicketClass::Standard)]
}

/// A name from [`NAMES`]
pub fn arb_name() -> impl Strategy<Value = String> {
    proptest::sample::select(NAMES.to_vec()).prop_map(str::to_string)
}

/// Initial capacities of up to `max` units per class
pub fn arb_initial_capacity(max: u32) -> impl Strategy<Value = InitialCapacity> {
    (0..=max, 0..=max).prop_map(|(priority, standard)| InitialCapacity::new(priority, standard))
}

/// Any command, with counts in `0..=max_count` (zero exercises input validation)
pub fn arb_command(max_count: u32) -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => (arb_name(), arb_class(), 0..=max_count)
            .prop_map(|(name, class, count)| Command::Register { name, class, count }),
        2 => (arb_name(), arb_class(), 0..=max_count)
            .prop_map(|(name, class, count)| Command::Cancel { name, class, count }),
        2 => Just(Command::Process),
        1 => Just(Command::CheckAvailability),
        1 => Just(Command::ViewSummary),
    ]
}

/// A sequence of up to `max_len` commands
pub fn arb_commands(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
    proptest::collection::vec(arb_command(4), 0..=max_len)
}
