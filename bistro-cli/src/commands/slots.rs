//! Slots command implementation.
//!
//! Prints one bookable start time per line, earliest first.

use crate::error::CliError;
use crate::utils::{load_configuration, now, open_restaurant, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;

/// Show bookable start times for a day.
#[derive(Args)]
pub struct SlotsCommand {
    /// Day to search (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: NaiveDate,

    /// Number of guests
    #[arg(long, value_name = "N")]
    pub party: u32,
}

impl SlotsCommand {
    /// Execute the slots command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let slots = restaurant.available_slots(self.date, self.party, now())?;
        if slots.is_empty() && !global.quiet {
            eprintln!("No tables for {} on {}", self.party, self.date);
        }
        for slot in slots {
            println!("{}", slot.format("%H:%M"));
        }

        Ok(())
    }
}
