//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the bistro data directory and store.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use bistro::config::CONFIG_FILE_NAME;
use bistro::database::DATABASE_FILE_NAME;
use bistro::{init_data_dir, InitOptions};
use clap::Args;
use std::path::PathBuf;

/// Initialize the bistro data directory and store.
#[derive(Args)]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Replace an existing store
    #[arg(long)]
    overwrite: bool,

    /// Create a commented configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Auto-initialization settings are ignored here; creating the store is
    /// the point of the command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => resolve_data_dir(global)?,
        };

        if self.dry_run {
            let db_path = data_dir.join(DATABASE_FILE_NAME);
            println!("Dry-run mode: no changes will be made");
            println!("Would initialize bistro in: {}", data_dir.display());
            if !data_dir.exists() {
                println!("  - Create data directory");
            }
            match (db_path.exists(), self.overwrite) {
                (true, true) => println!("  - Replace existing store: {}", db_path.display()),
                (true, false) => println!(
                    "  - ERROR: Store already exists (use --overwrite to replace): {}",
                    db_path.display()
                ),
                (false, _) => println!("  - Create store: {}", db_path.display()),
            }
            if self.with_config && !data_dir.join(CONFIG_FILE_NAME).exists() {
                println!("  - Create configuration file");
            }
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_data_dir(&options).map_err(CliError::from)?;

        if !global.quiet {
            println!("Initialized bistro in: {}", result.data_dir.display());
            if result.data_dir_created {
                println!("  - Created data directory");
            }
            if result.database_replaced {
                println!("  - Recreated store");
            } else {
                println!("  - Created store");
            }
            if result.config_created {
                println!("  - Created default configuration file");
            } else if self.with_config {
                println!("  - Configuration file already exists (not overwritten)");
            }
        }

        Ok(())
    }
}
