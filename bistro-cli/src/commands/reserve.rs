//! Reserve command implementation.
//!
//! Books a table and prints the confirmation code on stdout.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, now, open_restaurant, parse_date_time, GlobalOptions,
};
use bistro::NewReservation;
use chrono::NaiveDateTime;
use clap::Args;

/// Book a table.
#[derive(Args)]
pub struct ReserveCommand {
    /// Start time (YYYY-MM-DD HH:MM), on a slot boundary
    #[arg(long, value_name = "DATETIME", value_parser = parse_date_time)]
    pub at: NaiveDateTime,

    /// Number of guests
    #[arg(long, value_name = "N")]
    pub party: u32,

    /// Reference to the booking customer
    #[arg(long, value_name = "REF")]
    pub customer: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact e-mail address
    #[arg(long)]
    pub email: Option<String>,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let request = NewReservation::new(self.at, self.party, self.customer)
            .with_phone(self.phone)
            .with_email(self.email);
        let reservation = restaurant.create_reservation(&request, now())?;

        println!("{}", reservation.code());
        if global.verbose {
            eprintln!(
                "Booked {} guests at {} for {}",
                reservation.party_size(),
                format_timestamp(reservation.start_time()),
                reservation.customer_ref()
            );
        }

        Ok(())
    }
}
