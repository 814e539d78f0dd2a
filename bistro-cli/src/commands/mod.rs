//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and store
//! - `tables`: Add, list, hold and release tables
//! - `hours`: Set, clear and list opening hours
//! - `slots`: Show bookable start times
//! - `reserve`: Book a table
//! - `cancel`, `check_in`, `finish`, `pre_assign`: Reservation transitions
//! - `list`: List reservations in various formats
//! - `expire`: Sweep reservations past their grace period
//! - `dispatch`: Serve JSON requests from stdin
//! - `config`: Show the effective configuration or validate a file
//! - `completions`: Generate shell completion scripts

pub mod cancel;
pub mod check_in;
pub mod completions;
pub mod config;
pub mod dispatch;
pub mod expire;
pub mod finish;
pub mod hours;
pub mod init;
pub mod list;
pub mod pre_assign;
pub mod reserve;
pub mod slots;
pub mod tables;

pub use cancel::CancelCommand;
pub use check_in::CheckInCommand;
pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use dispatch::DispatchCommand;
pub use expire::ExpireCommand;
pub use finish::FinishCommand;
pub use hours::HoursCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use pre_assign::PreAssignCommand;
pub use reserve::ReserveCommand;
pub use slots::SlotsCommand;
pub use tables::TablesCommand;
