//! Cancel command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_restaurant, parse_code, GlobalOptions};
use bistro::ConfirmationCode;
use clap::Args;

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Confirmation code
    #[arg(value_parser = parse_code)]
    pub code: ConfirmationCode,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        restaurant.cancel(&self.code)?;
        if !global.quiet {
            eprintln!("Canceled {}", self.code);
        }

        Ok(())
    }
}
