//! Transaction log contract.
//!
//! The log is the audit trail of every queue transition. The engine appends
//! to it on every state change and only reads it back to reconcile the sales
//! summary against its own counters.

use crate::error::LogError;
use crate::types::TransactionRecord;

/// Column headers, written once when a log is initialized.
pub const LOG_HEADER: [&str; 4] = ["Timestamp", "Name", "Ticket Type", "Status"];

/// Append-only sink for [`TransactionRecord`]s.
///
/// Implementations must preserve write order: the order of `record` calls is
/// the order `records` returns. Methods take `&self` so a log can be shared
/// between the engine and whoever audits it.
pub trait TransactionLog: Send + Sync {
    /// Discards any prior content and writes the header.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Initialize`] if the backing store cannot be reset.
    fn initialize(&self) -> Result<(), LogError>;

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Write`] if the record could not be persisted.
    fn record(&self, record: &TransactionRecord) -> Result<(), LogError>;

    /// All records in write order, header excluded.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Read`] or [`LogError::Malformed`] if the backing
    /// store cannot be read or parsed.
    fn records(&self) -> Result<Vec<TransactionRecord>, LogError>;
}
