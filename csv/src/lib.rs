//! CSV-backed [`TransactionLog`].
//!
//! Each record is one row of `Timestamp,Name,Ticket Type,Status`, with the
//! timestamp at second precision. The file is truncated when the log is
//! initialized and opened in append mode for every write, so rows survive a
//! crash between operations.
//!
//! # Example
//!
//! ```no_run
//! use box_office_core::TransactionLog;
//! use box_office_csv::CsvTransactionLog;
//!
//! let log = CsvTransactionLog::new("ticket_transactions.csv");
//! log.initialize()?;
//! # Ok::<(), box_office_core::LogError>(())
//! ```

use box_office_core::{
    LogError, TicketLabel, TransactionLog, TransactionRecord, TransactionStatus, LOG_HEADER,
};
use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Transaction log stored as a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvTransactionLog {
    path: PathBuf,
}

impl CsvTransactionLog {
    /// Create a log backed by the file at `path`.
    ///
    /// Nothing touches the filesystem until [`TransactionLog::initialize`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionLog for CsvTransactionLog {
    fn initialize(&self) -> Result<(), LogError> {
        let file = File::create(&self.path).map_err(|e| LogError::Initialize(e.to_string()))?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(LOG_HEADER)
            .map_err(|e| LogError::Initialize(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| LogError::Initialize(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Transaction log initialized");
        Ok(())
    }

    fn record(&self, record: &TransactionRecord) -> Result<(), LogError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::Write(e.to_string()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let ticket_type = record.ticket_type.to_string();
        writer
            .write_record([
                record.formatted_timestamp().as_str(),
                record.name.as_str(),
                ticket_type.as_str(),
                record.status.label(),
            ])
            .map_err(|e| LogError::Write(e.to_string()))?;
        writer.flush().map_err(|e| LogError::Write(e.to_string()))?;

        Ok(())
    }

    fn records(&self) -> Result<Vec<TransactionRecord>, LogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| LogError::Read(e.to_string()))?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| LogError::Read(e.to_string()))?;
            records.push(parse_row(&row)?);
        }
        Ok(records)
    }
}

/// Parses one data row back into a [`TransactionRecord`].
fn parse_row(row: &csv::StringRecord) -> Result<TransactionRecord, LogError> {
    let line = row.position().map_or(0, csv::Position::line);
    let malformed = |reason: String| LogError::Malformed { line, reason };

    let fields: Vec<&str> = row.iter().collect();
    let [timestamp, name, ticket_type, status] = fields[..] else {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            LOG_HEADER.len(),
            row.len()
        )));
    };

    let timestamp = NaiveDateTime::parse_from_str(timestamp, TransactionRecord::TIMESTAMP_FORMAT)
        .map_err(|e| malformed(format!("bad timestamp {timestamp:?}: {e}")))?
        .and_utc();
    let status = TransactionStatus::from_label(status)
        .ok_or_else(|| malformed(format!("unknown status {status:?}")))?;

    Ok(TransactionRecord::new(
        timestamp,
        name,
        TicketLabel::parse(ticket_type),
        status,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;
    use box_office_core::TicketClass;
    use chrono::{TimeZone, Utc};

    fn log_in(dir: &tempfile::TempDir) -> CsvTransactionLog {
        CsvTransactionLog::new(dir.path().join("ticket_transactions.csv"))
    }

    #[test]
    fn initialize_writes_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);

        log.initialize().unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "Timestamp,Name,Ticket Type,Status\n");
        assert!(log.records().unwrap().is_empty());
    }

    #[test]
    fn rows_use_display_labels() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        log.initialize().unwrap();

        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 5).unwrap();
        log.record(&TransactionRecord::new(
            at,
            "Ann",
            TicketClass::Priority,
            TransactionStatus::SoldOut,
        ))
        .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents.lines().nth(1),
            Some("2025-03-01 09:30:05,Ann,VIP,Sold Out")
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        log.initialize().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        log.record(&TransactionRecord::new(
            at,
            "Doe, Jane",
            TicketClass::Standard,
            TransactionStatus::Pending,
        ))
        .unwrap();

        let records = log.records().unwrap();
        assert_eq!(records[0].name, "Doe, Jane");
    }

    #[test]
    fn unknown_status_is_malformed_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(
            log.path(),
            "Timestamp,Name,Ticket Type,Status\n\
             2025-03-01 00:00:00,Ann,VIP,Pending\n\
             2025-03-01 00:00:00,Ben,VIP,Refunded\n",
        )
        .unwrap();

        match log.records() {
            Err(LogError::Malformed { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("Refunded"));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(
            log.path(),
            "Timestamp,Name,Ticket Type,Status\nyesterday,Ann,VIP,Pending\n",
        )
        .unwrap();

        assert!(matches!(
            log.records(),
            Err(LogError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn rows_with_wrong_field_count_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        std::fs::write(
            log.path(),
            "Timestamp,Name,Ticket Type,Status\n\
             2025-03-01 00:00:00,Ann,VIP,Pending\n\
             2025-03-01 00:00:00,Ben,VIP,Pending,extra\n\
             2025-03-01 00:00:00,Cy,VIP\n",
        )
        .unwrap();

        match log.records() {
            Err(LogError::Malformed { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 5"));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn writing_before_initialize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir);
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        let result = log.record(&TransactionRecord::new(
            at,
            "Ann",
            TicketClass::Priority,
            TransactionStatus::Pending,
        ));

        assert!(matches!(result, Err(LogError::Write(_))));
    }
}
