//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Binary name as installed.
const BIN_NAME: &str = "bistro";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            eprintln!("# Generating {} completion script", self.shell);
            match self.shell {
                Shell::Bash => {
                    eprintln!("# Enable with: eval \"$(bistro completions bash)\"");
                }
                Shell::Zsh => {
                    eprintln!("# Save to a directory in $fpath, e.g. ~/.zsh/completions/_bistro");
                }
                Shell::Fish => {
                    eprintln!("# Enable with: bistro completions fish | source");
                }
                Shell::PowerShell => {
                    eprintln!(
                        "# Enable with: bistro completions powershell | Out-String | Invoke-Expression"
                    );
                }
                _ => {}
            }
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}
