//! Config command - manage chunker configuration.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use index_chunker::ChunkerConfig;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a config file with default settings
    Init(InitCmd),
}

#[derive(Args)]
pub struct InitCmd {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl ConfigCmd {
    pub async fn run(&self, explicit: Option<&Path>, config: ChunkerConfig) -> Result<()> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => ChunkerConfig::config_path()?,
        };

        match &self.command {
            ConfigSubCmd::Path => {
                println!("{}", path.display());
            }
            ConfigSubCmd::Show => {
                println!("Config: {}", path.display());
                println!();
                let rendered =
                    toml::to_string_pretty(&config).context("Failed to render config")?;
                println!("{}", rendered);
            }
            ConfigSubCmd::Init(cmd) => {
                if path.exists() && !cmd.force {
                    anyhow::bail!(
                        "Config already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                }
                ChunkerConfig::default().save_to(&path)?;
                println!("Wrote default config to {}", path.display());
            }
        }
        Ok(())
    }
}
