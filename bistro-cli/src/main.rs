//! Main entry point for the bistro CLI.
//!
//! This is the command-line interface for the bistro reservation system.
//! It provides commands for running a dining room:
//! - `tables` / `hours`: Floor plan and opening hours
//! - `slots` / `reserve`: Find a time and book it
//! - `check-in` / `finish`: Seat a party and free the table again
//! - `dispatch`: Serve JSON requests from stdin

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    if let Err(e) = bistro::init_logger(cli.verbose, cli.quiet).install() {
        eprintln!("Warning: could not install logger: {e}");
    }

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Tables(cmd) => cmd.execute(&global),
        cli::Command::Hours(cmd) => cmd.execute(&global),
        cli::Command::Slots(cmd) => cmd.execute(&global),
        cli::Command::Reserve(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::CheckIn(cmd) => cmd.execute(&global),
        cli::Command::Finish(cmd) => cmd.execute(&global),
        cli::Command::PreAssign(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Expire(cmd) => cmd.execute(&global),
        cli::Command::Dispatch(cmd) => cmd.execute(&global),
        cli::Command::Config(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
