//! Mock implementations of the engine's environment.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use box_office_core::{
    Clock, LogError, TransactionLog, TransactionRecord, TransactionStatus,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use box_office_testing::mocks::FixedClock;
/// use box_office_core::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

#[derive(Debug, Default)]
struct LogContents {
    initialized: bool,
    records: Vec<TransactionRecord>,
}

/// In-memory transaction log.
///
/// Clones share the same storage, so a test can hand one clone to the engine
/// and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTransactionLog {
    contents: Arc<RwLock<LogContents>>,
}

impl InMemoryTransactionLog {
    /// Create a new, uninitialized log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `initialize` has been called
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.contents.read().unwrap().initialized
    }

    /// Copy of all records in write order
    #[must_use]
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.contents.read().unwrap().records.clone()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.read().unwrap().records.len()
    }

    /// Whether no records have been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records with the given status
    #[must_use]
    pub fn count_status(&self, status: TransactionStatus) -> usize {
        self.contents
            .read()
            .unwrap()
            .records
            .iter()
            .filter(|record| record.status == status)
            .count()
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn initialize(&self) -> Result<(), LogError> {
        let mut contents = self
            .contents
            .write()
            .map_err(|e| LogError::Initialize(e.to_string()))?;
        contents.initialized = true;
        contents.records.clear();
        Ok(())
    }

    fn record(&self, record: &TransactionRecord) -> Result<(), LogError> {
        self.contents
            .write()
            .map_err(|e| LogError::Write(e.to_string()))?
            .records
            .push(record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<TransactionRecord>, LogError> {
        Ok(self
            .contents
            .read()
            .map_err(|e| LogError::Read(e.to_string()))?
            .records
            .clone())
    }
}

/// Transaction log that starts refusing writes after a fixed number of records.
///
/// Used to check that the engine's state never runs ahead of its log.
#[derive(Clone, Debug)]
pub struct FailingTransactionLog {
    inner: InMemoryTransactionLog,
    accept: usize,
}

impl FailingTransactionLog {
    /// Accept `accept` records, then fail every write
    #[must_use]
    pub fn after(accept: usize) -> Self {
        Self {
            inner: InMemoryTransactionLog::new(),
            accept,
        }
    }

    /// The records that were accepted
    #[must_use]
    pub const fn inner(&self) -> &InMemoryTransactionLog {
        &self.inner
    }
}

impl TransactionLog for FailingTransactionLog {
    fn initialize(&self) -> Result<(), LogError> {
        self.inner.initialize()
    }

    fn record(&self, record: &TransactionRecord) -> Result<(), LogError> {
        if self.inner.len() >= self.accept {
            return Err(LogError::Write(format!(
                "injected failure after {} records",
                self.accept
            )));
        }
        self.inner.record(record)
    }

    fn records(&self) -> Result<Vec<TransactionRecord>, LogError> {
        self.inner.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use box_office_core::TicketClass;

    fn record(status: TransactionStatus) -> TransactionRecord {
        TransactionRecord::new(test_clock().now(), "Ann", TicketClass::Priority, status)
    }

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn clones_share_storage() {
        let log = InMemoryTransactionLog::new();
        let handle = log.clone();

        log.record(&record(TransactionStatus::Pending)).unwrap();

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.count_status(TransactionStatus::Pending), 1);
    }

    #[test]
    fn initialize_truncates() {
        let log = InMemoryTransactionLog::new();
        log.record(&record(TransactionStatus::Pending)).unwrap();

        log.initialize().unwrap();

        assert!(log.is_initialized());
        assert!(log.is_empty());
    }

    #[test]
    fn failing_log_accepts_then_refuses() {
        let log = FailingTransactionLog::after(1);

        assert!(log.record(&record(TransactionStatus::Pending)).is_ok());
        assert!(matches!(
            log.record(&record(TransactionStatus::Pending)),
            Err(LogError::Write(_))
        ));
        assert_eq!(log.records().unwrap().len(), 1);
    }
}
