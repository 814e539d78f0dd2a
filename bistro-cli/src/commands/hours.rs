//! Hours command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_restaurant, parse_weekday, GlobalOptions};
use bistro::OpeningHours;
use chrono::Weekday;
use clap::Subcommand;

/// Manage opening hours.
#[derive(Subcommand)]
pub enum HoursCommand {
    /// Set the hours for one weekday
    Set {
        /// Weekday (e.g. "mon" or "friday")
        #[arg(value_parser = parse_weekday)]
        day: Weekday,

        /// Opening range as HH:MM-HH:MM, closing no later than 23:59
        #[arg(value_name = "RANGE")]
        range: String,
    },

    /// Mark a weekday closed
    Clear {
        /// Weekday (e.g. "mon" or "friday")
        #[arg(value_parser = parse_weekday)]
        day: Weekday,
    },

    /// List the weekly opening hours
    List,
}

impl HoursCommand {
    /// Execute the hours command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        match self {
            Self::Set { day, range } => {
                let hours = OpeningHours::parse(day, &range)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
                restaurant.set_opening_hours(&hours)?;
                if !global.quiet {
                    eprintln!("Open {hours}");
                }
            }
            Self::Clear { day } => {
                let was_open = restaurant.clear_opening_hours(day)?;
                if !global.quiet {
                    if was_open {
                        eprintln!("Closed on {day}");
                    } else {
                        eprintln!("Already closed on {day}");
                    }
                }
            }
            Self::List => {
                for hours in restaurant.opening_hours()? {
                    println!("{hours}");
                }
            }
        }

        Ok(())
    }
}
