//! Minified command - run the minification classifier over files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use index_chunker::{ChunkerConfig, is_minified_with};

#[derive(Args)]
pub struct MinifiedCmd {
    /// Files to classify
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Only print paths classified as minified
    #[arg(long, short)]
    pub quiet: bool,
}

impl MinifiedCmd {
    pub async fn run(&self, config: ChunkerConfig) -> Result<()> {
        for path in &self.paths {
            let content = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let minified = is_minified_with(&content, &path.to_string_lossy(), &config.minified);

            if self.quiet {
                if minified {
                    println!("{}", path.display());
                }
            } else {
                let verdict = if minified { "minified" } else { "source" };
                println!("{}\t{}", verdict, path.display());
            }
        }
        Ok(())
    }
}
