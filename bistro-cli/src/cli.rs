//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CancelCommand, CheckInCommand, CompletionsCommand, ConfigCommand, DispatchCommand,
    ExpireCommand, FinishCommand, HoursCommand, InitCommand, ListCommand, PreAssignCommand,
    ReserveCommand, SlotsCommand, TablesCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for seating restaurant guests.
#[derive(Parser)]
#[command(name = "bistro")]
#[command(version, about = "Manage restaurant tables and reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "BISTRO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the store busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "BISTRO_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic store initialization
    #[arg(long, global = true, env = "BISTRO_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and store
    Init(InitCommand),

    /// Manage the floor plan
    #[command(subcommand)]
    Tables(TablesCommand),

    /// Manage opening hours
    #[command(subcommand)]
    Hours(HoursCommand),

    /// Show bookable start times for a day
    Slots(SlotsCommand),

    /// Book a table
    Reserve(ReserveCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Seat an arriving party
    CheckIn(CheckInCommand),

    /// Record that a seated party left
    Finish(FinishCommand),

    /// Set a table aside for a reservation ahead of arrival
    PreAssign(PreAssignCommand),

    /// List reservations
    List(ListCommand),

    /// Expire reservations past their grace period
    Expire(ExpireCommand),

    /// Answer JSON requests read line by line from stdin
    Dispatch(DispatchCommand),

    /// Show the effective configuration or validate a file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
