//! # Box Office Testing
//!
//! Testing utilities and helpers for the box office allocation engine.
//!
//! This crate provides:
//! - Mock implementations of the engine's environment ([`FixedClock`],
//!   [`InMemoryTransactionLog`], [`FailingTransactionLog`])
//! - [`EngineTest`], a Given-When-Then harness over the command surface
//! - proptest strategies for commands and capacities ([`properties`])
//!
//! ## Example
//!
//! ```
//! use box_office_core::{AllocationEngine, AllocationEnvironment, InitialCapacity, TicketClass};
//! use box_office_testing::{test_clock, InMemoryTransactionLog};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), box_office_core::AllocationError> {
//! let log = InMemoryTransactionLog::new();
//! let env = AllocationEnvironment::new(Arc::new(test_clock()), Arc::new(log.clone()));
//! let mut engine = AllocationEngine::new(InitialCapacity::new(1, 1), env)?;
//!
//! engine.register("Alice", TicketClass::Priority, 1)?;
//! assert_eq!(log.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod mocks;
pub mod properties;

// Re-export commonly used items
pub use engine_test::EngineTest;
pub use mocks::{test_clock, FailingTransactionLog, FixedClock, InMemoryTransactionLog};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "box_office_core=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
