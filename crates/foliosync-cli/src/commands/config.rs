//! Config command - view and validate configuration

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;

use foliosync_core::config::Config;

use crate::output::OutputFormat;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (password masked)
    Show,
    /// Validate the configuration and report problems
    Validate,
    /// Print the configuration file path in use
    Path,
}

impl ConfigCommand {
    pub fn execute(&self, path: &Path, mut config: Config, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                if !config.account.password.is_empty() {
                    config.account.password = "********".to_string();
                }
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                    OutputFormat::Human => print!("{}", serde_yaml::to_string(&config)?),
                }
                Ok(())
            }
            ConfigCommand::Validate => {
                let errors = config.validate();
                if errors.is_empty() {
                    println!("configuration OK");
                    Ok(())
                } else {
                    for error in &errors {
                        eprintln!("configuration error: {error}");
                    }
                    bail!("invalid configuration ({} problems)", errors.len());
                }
            }
            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}
