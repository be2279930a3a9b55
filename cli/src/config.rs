//! Configuration management for the box office terminal.
//!
//! Loads configuration from environment variables with sensible defaults.

use box_office_core::InitialCapacity;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ticket pool configuration
    pub tickets: TicketConfig,
    /// Path of the CSV transaction log
    pub log_path: PathBuf,
    /// Terminal presentation configuration
    pub display: DisplayConfig,
    /// Prometheus listener address; metrics are not exported when unset
    pub metrics_addr: Option<SocketAddr>,
}

/// Ticket pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Initial VIP units
    pub priority_capacity: u32,
    /// Initial Regular units
    pub standard_capacity: u32,
    /// Largest count a single request may ask for
    pub max_per_request: u32,
}

/// Terminal presentation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Added to queue positions before they are shown
    pub position_offset: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tickets: TicketConfig {
                priority_capacity: parsed(&lookup, "BOX_OFFICE_PRIORITY_CAPACITY").unwrap_or(5),
                standard_capacity: parsed(&lookup, "BOX_OFFICE_STANDARD_CAPACITY").unwrap_or(5),
                max_per_request: parsed::<u32>(&lookup, "BOX_OFFICE_MAX_TICKETS_PER_REQUEST")
                    .filter(|max| *max > 0)
                    .unwrap_or(10),
            },
            log_path: lookup("BOX_OFFICE_LOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map_or_else(|| PathBuf::from("ticket_transactions.csv"), PathBuf::from),
            display: DisplayConfig {
                position_offset: parsed(&lookup, "BOX_OFFICE_POSITION_OFFSET").unwrap_or(1000),
            },
            metrics_addr: parsed(&lookup, "BOX_OFFICE_METRICS_ADDR"),
        }
    }

    /// Initial capacities for the engine
    #[must_use]
    pub const fn initial_capacity(&self) -> InitialCapacity {
        InitialCapacity::new(
            self.tickets.priority_capacity,
            self.tickets.standard_capacity,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Looks up `key` and parses its trimmed value; `None` if unset or unparseable.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.initial_capacity(), InitialCapacity::new(5, 5));
        assert_eq!(config.tickets.max_per_request, 10);
        assert_eq!(config.log_path, PathBuf::from("ticket_transactions.csv"));
        assert_eq!(config.display.position_offset, 1000);
        assert_eq!(config.metrics_addr, None);
    }

    #[test]
    fn overrides() {
        let config = config_with(&[
            ("BOX_OFFICE_PRIORITY_CAPACITY", "50"),
            ("BOX_OFFICE_STANDARD_CAPACITY", " 100 "),
            ("BOX_OFFICE_LOG_PATH", "/tmp/sales.csv"),
            ("BOX_OFFICE_MAX_TICKETS_PER_REQUEST", "4"),
            ("BOX_OFFICE_POSITION_OFFSET", "0"),
            ("BOX_OFFICE_METRICS_ADDR", "127.0.0.1:9000"),
        ]);

        assert_eq!(config.initial_capacity(), InitialCapacity::new(50, 100));
        assert_eq!(config.tickets.max_per_request, 4);
        assert_eq!(config.log_path, PathBuf::from("/tmp/sales.csv"));
        assert_eq!(config.display.position_offset, 0);
        assert_eq!(config.metrics_addr, "127.0.0.1:9000".parse().ok());
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config_with(&[
            ("BOX_OFFICE_PRIORITY_CAPACITY", "lots"),
            ("BOX_OFFICE_MAX_TICKETS_PER_REQUEST", "0"),
            ("BOX_OFFICE_METRICS_ADDR", "localhost"),
        ]);

        assert_eq!(config.tickets.priority_capacity, 5);
        assert_eq!(config.tickets.max_per_request, 10);
        assert_eq!(config.metrics_addr, None);
    }
}
