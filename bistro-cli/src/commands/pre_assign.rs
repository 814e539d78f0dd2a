//! Pre-assign command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_restaurant, parse_code, GlobalOptions};
use bistro::ConfirmationCode;
use clap::Args;

/// Set a table aside for a reservation ahead of arrival.
#[derive(Args)]
pub struct PreAssignCommand {
    /// Confirmation code
    #[arg(value_parser = parse_code)]
    pub code: ConfirmationCode,
}

impl PreAssignCommand {
    /// Execute the pre-assign command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let table = restaurant.pre_assign(&self.code)?;
        println!("{table}");

        Ok(())
    }
}
