//! Build script for bistro-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("bistro")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage restaurant tables and reservations")
        .long_about(
            "Command-line tool for booking, seating and releasing restaurant tables against a shared store",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("BISTRO_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the store busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("BISTRO_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic store initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("BISTRO_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and store")
                .long_about("Create the store and, optionally, a commented configuration file"),
            Command::new("tables")
                .about("Manage the floor plan")
                .long_about("Add, list, hold and release physical tables"),
            Command::new("hours")
                .about("Manage opening hours")
                .long_about("Set, clear and list the opening hours for each weekday"),
            Command::new("slots")
                .about("Show bookable start times for a day")
                .long_about("List the start times on a day that can still seat a party"),
            Command::new("reserve")
                .about("Book a table")
                .long_about("Create a reservation and print its confirmation code"),
            Command::new("cancel")
                .about("Cancel a reservation")
                .long_about("Cancel an active reservation and free any table set aside for it"),
            Command::new("check-in")
                .about("Seat an arriving party")
                .long_about(
                    "Seat the party of a reservation within its grace period and print the table number",
                ),
            Command::new("finish")
                .about("Record that a seated party left")
                .long_about("Free the table of a checked-in reservation"),
            Command::new("pre-assign")
                .about("Set a table aside for a reservation ahead of arrival")
                .long_about("Claim a table for an active reservation before the party arrives"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservations as a table, JSON, CSV or TSV"),
            Command::new("expire")
                .about("Expire reservations past their grace period")
                .long_about("Mark every overdue active reservation expired and free its table"),
            Command::new("dispatch")
                .about("Answer JSON requests read line by line from stdin")
                .long_about("Serve one JSON request per stdin line with one reply per stdout line"),
            Command::new("config")
                .about("Show the effective configuration or validate a file")
                .long_about("Print the merged configuration as YAML or check a configuration file"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("bistro.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
