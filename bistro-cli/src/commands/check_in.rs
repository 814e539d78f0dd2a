//! Check-in command implementation.
//!
//! Seats the party and prints the table number on stdout.

use crate::error::CliError;
use crate::utils::{load_configuration, now, open_restaurant, parse_code, GlobalOptions};
use bistro::ConfirmationCode;
use clap::Args;

/// Seat an arriving party.
#[derive(Args)]
pub struct CheckInCommand {
    /// Confirmation code
    #[arg(value_parser = parse_code)]
    pub code: ConfirmationCode,
}

impl CheckInCommand {
    /// Execute the check-in command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let table = restaurant.check_in(&self.code, now())?;
        println!("{table}");

        Ok(())
    }
}
