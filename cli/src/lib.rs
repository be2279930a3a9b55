//! Interactive terminal for the box office.
//!
//! Wires a [`box_office_core::AllocationEngine`] to a CSV transaction log
//! and drives it from a numbered menu.

pub mod config;
pub mod menu;
pub mod session;

pub use config::Config;
pub use menu::{InputError, MenuChoice};
pub use session::Session;
