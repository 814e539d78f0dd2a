//! Expire command implementation.
//!
//! Sweeps every ACTIVE reservation whose grace period has run out.

use crate::error::CliError;
use crate::utils::{load_configuration, now, open_restaurant, GlobalOptions};
use clap::Args;

/// Expire reservations past their grace period.
#[derive(Args)]
pub struct ExpireCommand {}

impl ExpireCommand {
    /// Execute the expire command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let expired = restaurant.expire_overdue(now())?;

        if global.quiet {
            if !expired.is_empty() {
                println!("{}", expired.len());
            }
        } else {
            eprintln!("Expired {} reservation(s)", expired.len());
            if global.verbose {
                for code in &expired {
                    eprintln!("  - {code}");
                }
            }
        }

        Ok(())
    }
}
