//! Parsing of menu selections and prompt answers.

use box_office_core::TicketClass;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Menu text printed before every selection.
pub const MENU: &str = "\
===== Box Office =====
1. Register
2. Check Availability
3. Process Tickets
4. Cancel
5. View Summary
6. Exit";

/// One entry of the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// Queue tickets for a requester
    Register,
    /// Show remaining capacity per class
    CheckAvailability,
    /// Confirm queued requests
    Process,
    /// Withdraw queued requests
    Cancel,
    /// Show sales figures
    ViewSummary,
    /// Leave the program
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Register),
            "2" => Ok(Self::CheckAvailability),
            "3" => Ok(Self::Process),
            "4" => Ok(Self::Cancel),
            "5" => Ok(Self::ViewSummary),
            "6" => Ok(Self::Exit),
            other => Err(InputError::MenuChoice(other.to_string())),
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Register => "register",
            Self::CheckAvailability => "check availability",
            Self::Process => "process",
            Self::Cancel => "cancel",
            Self::ViewSummary => "view summary",
            Self::Exit => "exit",
        };
        f.write_str(label)
    }
}

/// Prompt answer that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Not one of the menu numbers
    #[error("Invalid choice {0:?}, enter a number from 1 to 6")]
    MenuChoice(String),

    /// Not a ticket class
    #[error("Invalid ticket type {0:?}, enter V for VIP or R for Regular")]
    TicketClass(String),

    /// Not a positive integer within the per-request limit
    #[error("Invalid count {input:?}, enter a whole number from 1 to {max}")]
    Count {
        /// What was typed
        input: String,
        /// Largest accepted count
        max: u32,
    },

    /// Blank requester name
    #[error("Name cannot be empty")]
    EmptyName,
}

/// Parses a ticket class answer (`V`/`R`, or the full label).
///
/// # Errors
///
/// Returns [`InputError::TicketClass`] for anything else.
pub fn parse_class(input: &str) -> Result<TicketClass, InputError> {
    input
        .parse::<TicketClass>()
        .map_err(|_| InputError::TicketClass(input.trim().to_string()))
}

/// Parses a ticket count in `1..=max`.
///
/// # Errors
///
/// Returns [`InputError::Count`] if `input` is not an integer in range.
pub fn parse_count(input: &str, max: u32) -> Result<u32, InputError> {
    let input = input.trim();
    input
        .parse::<u32>()
        .ok()
        .filter(|count| (1..=max).contains(count))
        .ok_or_else(|| InputError::Count {
            input: input.to_string(),
            max,
        })
}

/// Trims a requester name, refusing blanks.
///
/// # Errors
///
/// Returns [`InputError::EmptyName`] if nothing but whitespace was typed.
pub fn parse_name(input: &str) -> Result<String, InputError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    Ok(name.to_string())
}
