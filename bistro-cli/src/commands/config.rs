//! Config command implementation.
//!
//! `show` prints the effective configuration after every layer is merged;
//! `validate` checks a configuration file without touching the store.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use bistro::config::{ConfigLoader, ConfigValidator};
use clap::Subcommand;
use std::path::PathBuf;

/// Inspect and check configuration.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as YAML
    Show,

    /// Check a configuration file for errors
    Validate {
        /// Configuration file to validate
        #[arg(value_name = "CONFIG_PATH")]
        config_path: PathBuf,
    },
}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            Self::Show => {
                let config = load_configuration(global)?;
                let yaml = serde_yaml::to_string(&config)
                    .map_err(|e| CliError::Config(e.to_string()))?;
                print!("{yaml}");
                Ok(())
            }
            Self::Validate { config_path } => {
                if !config_path.exists() {
                    return Err(CliError::InvalidArguments(format!(
                        "File not found: {}",
                        config_path.display()
                    )));
                }

                let config = ConfigLoader::load_file(&config_path).map_err(|e| {
                    eprintln!("Parse error: {e}");
                    CliError::SemanticFailure("Configuration file is invalid".to_string())
                })?;

                match ConfigValidator::validate(&config) {
                    Ok(()) => {
                        if !global.quiet {
                            println!("Configuration is valid");
                        }
                        Ok(())
                    }
                    Err(e) => {
                        eprintln!("Validation error: {e}");
                        Err(CliError::SemanticFailure(
                            "Configuration validation failed".to_string(),
                        ))
                    }
                }
            }
        }
    }
}
