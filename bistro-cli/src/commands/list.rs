//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::utils::{
    csv_error, format_timestamp, json_error, load_configuration, open_restaurant, GlobalOptions,
};
use bistro::config::OutputFormat as ConfiguredFormat;
use bistro::{Reservation, ReservationFilter, ReservationStatus};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::io::Write;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 9] = [
    "code",
    "start_time",
    "party_size",
    "customer_ref",
    "status",
    "table_number",
    "phone",
    "email",
    "created_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format (defaults to `output_format` from the configuration)
    #[arg(long, value_enum, env = "BISTRO_OUTPUT_FORMAT", ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Only reservations in this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<ReservationStatus>,

    /// Only reservations starting on this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<ConfiguredFormat> for OutputFormat {
    fn from(format: ConfiguredFormat) -> Self {
        match format {
            ConfiguredFormat::Table => Self::Table,
            ConfiguredFormat::Json => Self::Json,
            ConfiguredFormat::Csv => Self::Csv,
            ConfiguredFormat::Tsv => Self::Tsv,
        }
    }
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;

        let filter = ReservationFilter {
            status: self.status,
            date: self.date,
        };
        let reservations = restaurant.list(&filter)?;

        let format = self
            .format
            .or_else(|| config.output_format.map(OutputFormat::from))
            .unwrap_or(OutputFormat::Table);
        match format {
            OutputFormat::Table => format_as_table(&reservations)?,
            OutputFormat::Json => format_as_json(&reservations)?,
            OutputFormat::Csv => format_as_delimited(&reservations, b',')?,
            OutputFormat::Tsv => format_as_delimited(&reservations, b'\t')?,
        }

        Ok(())
    }
}

fn table_column(res: &Reservation) -> String {
    res.table_number()
        .map_or_else(String::new, |table| table.to_string())
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    // Contact details are left out of the human-readable view.
    writeln!(handle, "CODE\tSTART\tPARTY\tCUSTOMER\tSTATUS\tTABLE")?;
    for res in reservations {
        let table = table_column(res);
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}",
            res.code(),
            format_timestamp(res.start_time()),
            res.party_size(),
            res.customer_ref(),
            res.status(),
            if table.is_empty() { "-" } else { table.as_str() },
        )?;
    }

    Ok(())
}

/// Format reservations as JSON.
fn format_as_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = reservations
        .iter()
        .map(|r| {
            serde_json::json!({
                "code": r.code(),
                "start_time": format_timestamp(r.start_time()),
                "party_size": r.party_size(),
                "customer_ref": r.customer_ref(),
                "status": r.status(),
                "table_number": r.table_number(),
                "phone": r.phone(),
                "email": r.email(),
                "checked_in_at": r.checked_in_at().map(format_timestamp),
                "finished_at": r.finished_at().map(format_timestamp),
                "created_at": format_timestamp(r.created_at()),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data).map_err(json_error)?;
    writeln!(handle)?;

    Ok(())
}

/// Format reservations as delimited output (CSV or TSV).
fn format_as_delimited(reservations: &[Reservation], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for res in reservations {
        writer
            .write_record([
                res.code().to_string(),
                format_timestamp(res.start_time()),
                res.party_size().to_string(),
                res.customer_ref().to_string(),
                res.status().to_string(),
                table_column(res),
                res.phone().unwrap_or("").to_string(),
                res.email().unwrap_or("").to_string(),
                format_timestamp(res.created_at()),
            ])
            .map_err(csv_error)?;
    }
    writer.flush()?;

    Ok(())
}
