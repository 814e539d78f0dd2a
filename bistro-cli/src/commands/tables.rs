//! Tables command implementation.
//!
//! Floor plan management: add tables, list them, and take them out of or
//! back into service.

use crate::error::CliError;
use crate::utils::{
    json_error, load_configuration, open_restaurant, parse_table_number, GlobalOptions,
};
use bistro::{RestaurantTable, TableNumber};
use clap::Subcommand;
use std::io::Write;

/// Manage the floor plan.
#[derive(Subcommand)]
pub enum TablesCommand {
    /// Add a table
    Add {
        /// Table number
        #[arg(value_parser = parse_table_number)]
        number: TableNumber,

        /// Number of seats
        #[arg(long)]
        capacity: u32,

        /// Where the table stands (e.g. "terrace")
        #[arg(long)]
        location: Option<String>,
    },

    /// List tables with their status
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Take an EMPTY table out of service
    Hold {
        /// Table number
        #[arg(value_parser = parse_table_number)]
        number: TableNumber,
    },

    /// Return a table to service as EMPTY
    Release {
        /// Table number
        #[arg(value_parser = parse_table_number)]
        number: TableNumber,
    },
}

impl TablesCommand {
    /// Execute the tables command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        match self {
            Self::Add {
                number,
                capacity,
                location,
            } => {
                let table = RestaurantTable::new(number, capacity)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?
                    .with_location(location);
                restaurant.add_table(&table)?;
                if !global.quiet {
                    eprintln!("Added table {number} ({capacity} seats)");
                }
            }
            Self::List { json } => {
                let tables = restaurant.list_tables()?;
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                if json {
                    serde_json::to_writer_pretty(&mut handle, &tables).map_err(json_error)?;
                    writeln!(handle)?;
                } else {
                    writeln!(handle, "NUMBER\tCAPACITY\tSTATUS\tLOCATION")?;
                    for table in &tables {
                        writeln!(
                            handle,
                            "{}\t{}\t{}\t{}",
                            table.number(),
                            table.capacity(),
                            table.status(),
                            table.location().unwrap_or("-"),
                        )?;
                    }
                }
            }
            Self::Hold { number } => {
                restaurant.hold_table(number)?;
                if !global.quiet {
                    eprintln!("Table {number} is held");
                }
            }
            Self::Release { number } => {
                restaurant.release_table(number)?;
                if !global.quiet {
                    eprintln!("Table {number} is free");
                }
            }
        }

        Ok(())
    }
}
