//! Dependency injection for the engine.
//!
//! All I/O the engine performs goes through the traits here, so tests can
//! swap in a fixed clock and an in-memory log.

use crate::log::TransactionLog;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use box_office_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let _now = clock.now();
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Environment dependencies for the allocation engine
#[derive(Clone)]
pub struct AllocationEnvironment {
    /// Clock for record timestamps
    pub clock: Arc<dyn Clock>,
    /// Append-only sink for every state transition
    pub log: Arc<dyn TransactionLog>,
}

impl AllocationEnvironment {
    /// Creates a new `AllocationEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, log: Arc<dyn TransactionLog>) -> Self {
        Self { clock, log }
    }
}

impl std::fmt::Debug for AllocationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocationEnvironment")
            .field("clock", &"<clock>")
            .field("log", &"<transaction log>")
            .finish()
    }
}
