//! Languages command - list the extension routing table.

use anyhow::{Context, Result};
use clap::Args;
use index_chunker::chunker::Chunker;
use index_chunker::{ChunkerConfig, ChunkerRegistry};

#[derive(Args)]
pub struct LanguagesCmd {}

impl LanguagesCmd {
    pub async fn run(&self, config: ChunkerConfig) -> Result<()> {
        let registry =
            ChunkerRegistry::from_config(&config).context("Failed to build chunker registry")?;

        println!("{:<8} {:<12} {:<8} LEGACY", "EXT", "LANGUAGE", "STRATEGY");
        for ext in registry.extensions() {
            let chunker = registry.pick(ext);
            let legacy = if registry.legacy(ext).is_some() { "yes" } else { "-" };
            println!(
                "{:<8} {:<12} {:<8} {}",
                ext,
                chunker.language(),
                chunker.kind(),
                legacy
            );
        }
        let fallback = registry.fallback();
        println!(
            "{:<8} {:<12} {:<8} -",
            "*",
            fallback.language(),
            fallback.kind()
        );

        Ok(())
    }
}
