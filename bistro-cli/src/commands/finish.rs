//! Finish command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, now, open_restaurant, parse_code, GlobalOptions};
use bistro::ConfirmationCode;
use clap::Args;

/// Record that a seated party left.
#[derive(Args)]
pub struct FinishCommand {
    /// Confirmation code
    #[arg(value_parser = parse_code)]
    pub code: ConfirmationCode,
}

impl FinishCommand {
    /// Execute the finish command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let table = restaurant.finish(&self.code, now())?;
        if !global.quiet {
            eprintln!("Table {table} is free");
        }

        Ok(())
    }
}
