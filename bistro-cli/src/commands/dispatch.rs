//! Dispatch command implementation.
//!
//! Reads one JSON request per line from stdin and writes one reply per
//! line to stdout, so the binary can sit behind any line-oriented front end.

use crate::error::CliError;
use crate::utils::{json_error, load_configuration, open_restaurant, GlobalOptions};
use bistro::dispatch::Dispatcher;
use clap::Args;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Answer JSON requests read line by line from stdin.
#[derive(Args)]
pub struct DispatchCommand {
    /// Write `OK ...` / `ERR ...` lines instead of JSON replies
    #[arg(long)]
    pub plain: bool,
}

impl DispatchCommand {
    /// Execute the dispatch command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let restaurant = open_restaurant(global, &config)?;
        let dispatcher = Dispatcher::new(Arc::new(restaurant));

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = dispatcher.dispatch_line(&line);
            if self.plain {
                writeln!(out, "{}", response.reply_line())?;
            } else {
                serde_json::to_writer(&mut out, &response).map_err(json_error)?;
                writeln!(out)?;
            }
            out.flush()?;
        }

        Ok(())
    }
}
