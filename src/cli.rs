//! CLI argument definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use index_chunker::ChunkerConfig;

use crate::commands::{ChunkCmd, ConfigCmd, LanguagesCmd, MinifiedCmd};

#[derive(Parser)]
#[command(name = "idxc")]
#[command(about = "Split source files into file, class and method chunks")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.config/idxc/config.toml)
    #[arg(long, global = true, env = "IDXC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chunk files and print the hierarchy
    Chunk(ChunkCmd),

    /// Report whether files look minified or bundled
    Minified(MinifiedCmd),

    /// List supported extensions and their strategies
    Languages(LanguagesCmd),

    /// Manage configuration
    Config(ConfigCmd),
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        // `config init` may target a file that does not exist yet
        let initializing = matches!(self.command, Command::Config(_));
        let config = match &self.config {
            Some(path) if path.exists() || !initializing => ChunkerConfig::load_from(path)?,
            Some(_) => ChunkerConfig::default(),
            None => ChunkerConfig::load()?,
        };

        match &self.command {
            Command::Chunk(cmd) => cmd.run(config).await,
            Command::Minified(cmd) => cmd.run(config).await,
            Command::Languages(cmd) => cmd.run(config).await,
            Command::Config(cmd) => cmd.run(self.config.as_deref(), config).await,
        }
    }
}
