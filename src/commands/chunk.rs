//! Chunk command - extract and print chunk hierarchies.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use index_chunker::chunker::{ChunkContext, ChunkerRegistry, FileOutcome, Route, chunk_files};
use index_chunker::{ChunkResult, ChunkerConfig, SourceFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Args)]
pub struct ChunkCmd {
    /// Files, directories or glob patterns (e.g., "src/**/*.rs")
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Print one JSON object per chunk instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Use the legacy chunker where one exists
    #[arg(long)]
    pub legacy: bool,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl ChunkCmd {
    pub async fn run(&self, config: ChunkerConfig) -> Result<()> {
        let paths = expand_patterns(&self.patterns)?;
        if paths.is_empty() {
            anyhow::bail!("No files matched");
        }

        let files = read_files(&paths).await;
        debug!(files = files.len(), "read source files");

        let registry =
            ChunkerRegistry::from_config(&config).context("Failed to build chunker registry")?;

        let token = CancellationToken::new();
        let mut ctx = ChunkContext::new().with_token(token.clone());
        if let Some(ms) = self.timeout_ms {
            ctx = ctx.with_timeout(Duration::from_millis(ms));
        }

        let on_interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let route = if self.legacy {
            Route::Legacy
        } else {
            Route::Generic
        };
        let thresholds = config.minified;
        let outcomes = tokio::task::spawn_blocking(move || {
            chunk_files(&registry, &files, &ctx, &thresholds, route)
        })
        .await
        .context("Chunking task failed")?;
        token.cancel();

        let mut failed = 0;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(result) if self.json => print_json(result)?,
                Ok(result) => print!("{}", render_tree(outcome, result)),
                Err(e) => {
                    failed += 1;
                    eprintln!("{}: {}", outcome.path, e);
                }
            }
        }

        if failed > 0 {
            eprintln!("{} of {} files failed", failed, outcomes.len());
        }

        Ok(())
    }
}

/// Expand globs; directories expand to every file beneath them.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let path = PathBuf::from(pattern);
        let pattern = if path.is_dir() {
            format!("{}/**/*", pattern.trim_end_matches('/'))
        } else {
            pattern.clone()
        };

        let entries =
            glob::glob(&pattern).with_context(|| format!("Invalid pattern: {}", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable path"),
            }
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

async fn read_files(paths: &[PathBuf]) -> Vec<SourceFile> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                continue;
            }
        };
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        files.push(
            SourceFile::from_bytes(path.to_string_lossy().into_owned(), content)
                .with_modified(modified),
        );
    }

    files
}

fn print_json(result: &ChunkResult) -> Result<()> {
    for chunk in &result.chunks {
        println!(
            "{}",
            serde_json::to_string(chunk).context("Failed to serialize chunk")?
        );
    }
    Ok(())
}

/// Indented outline of a result, one line per chunk.
fn render_tree(outcome: &FileOutcome, result: &ChunkResult) -> String {
    let mut out = String::new();
    let marker = if outcome.minified { ", minified" } else { "" };
    let _ = writeln!(out, "{} [{}{}]", outcome.path, outcome.strategy, marker);

    // Pre-order: parents always precede their children
    let mut depth: HashMap<&str, usize> = HashMap::new();
    for chunk in &result.chunks {
        let level = chunk
            .parent_id
            .as_deref()
            .and_then(|p| depth.get(p))
            .map_or(0, |d| d + 1);
        depth.insert(chunk.id.as_str(), level);

        if chunk.is_root() {
            continue;
        }
        let _ = writeln!(
            out,
            "{}{} {} (L{}-{})",
            "  ".repeat(level),
            chunk.level,
            chunk.name,
            chunk.start_line,
            chunk.end_line
        );
    }

    for error in &result.errors {
        let _ = writeln!(out, "  ! {}", error);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_chunker::chunker::{Chunker, StrategyKind};

    #[test]
    fn test_render_tree_indents_by_depth() {
        let registry = ChunkerRegistry::with_defaults().unwrap();
        let source = "class A:\n    def f(self):\n        pass\n\n\ndef g():\n    pass\n";
        let file = SourceFile::new("m.py", source.as_bytes(), "python");
        let result = registry.pick("py").chunk(&file, &ChunkContext::new()).unwrap();

        let outcome = FileOutcome {
            path: "m.py".to_string(),
            strategy: StrategyKind::Generic,
            minified: false,
            result: Ok(result.clone()),
        };
        let tree = render_tree(&outcome, &result);

        assert_eq!(
            tree,
            "m.py [generic]\n  class A (L1-3)\n    method f (L2-3)\n  method g (L6-7)\n"
        );
    }

    #[test]
    fn test_expand_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg").join("a.go"), "package pkg").unwrap();
        std::fs::write(dir.path().join("b.py"), "x = 1").unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let all = expand_patterns(std::slice::from_ref(&root)).unwrap();
        assert_eq!(all.len(), 2);

        let only_go = expand_patterns(&[format!("{}/**/*.go", root)]).unwrap();
        assert_eq!(only_go.len(), 1);
        assert!(only_go[0].ends_with("pkg/a.go"));
    }
}
