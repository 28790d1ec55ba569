//! Parallel chunking of many files.
//!
//! One file's failure is recorded on its outcome and never stops the batch.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::minified::{MinifiedThresholds, is_minified_with};
use crate::types::{ChunkResult, SourceFile};

use super::context::ChunkContext;
use super::error::ChunkerError;
use super::language::{Chunker, StrategyKind};
use super::registry::ChunkerRegistry;

/// Which path to take for files with a dedicated strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Generic,
    /// Prefer the legacy chunker where one exists.
    Legacy,
}

/// Result of chunking one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: String,
    pub strategy: StrategyKind,
    /// True when the file was routed to the fallback for looking minified.
    pub minified: bool,
    pub result: Result<ChunkResult, ChunkerError>,
}

/// Chunk a batch of files on the rayon pool, preserving input order.
pub fn chunk_files(
    registry: &ChunkerRegistry,
    files: &[SourceFile],
    ctx: &ChunkContext,
    thresholds: &MinifiedThresholds,
    route: Route,
) -> Vec<FileOutcome> {
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| chunk_one(registry, file, ctx, thresholds, route))
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let chunks: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|r| r.chunks.len())
        .sum();
    info!(files = files.len(), chunks, failed, "batch complete");

    outcomes
}

fn chunk_one(
    registry: &ChunkerRegistry,
    file: &SourceFile,
    ctx: &ChunkContext,
    thresholds: &MinifiedThresholds,
    route: Route,
) -> FileOutcome {
    let minified = is_minified_with(&file.content, &file.path, thresholds);

    let chunker: &dyn Chunker = if minified {
        registry.fallback()
    } else {
        let ext = file.extension().unwrap_or_default();
        match route {
            Route::Legacy => registry
                .legacy(&ext)
                .unwrap_or_else(|| registry.pick(&ext)),
            Route::Generic => registry.pick(&ext),
        }
    };

    let result = chunker.chunk(file, ctx);
    if let Err(e) = &result {
        if !e.is_cancellation() {
            warn!(path = %file.path, error = %e, "failed to chunk file");
        }
    }

    FileOutcome {
        path: file.path.clone(),
        strategy: chunker.kind(),
        minified,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkLevel;

    fn files() -> Vec<SourceFile> {
        vec![
            SourceFile::from_bytes("pkg/a.go", b"package a\n\nfunc A() {}\n".as_slice()),
            SourceFile::from_bytes("dist/app.min.js", b"function a(){return 1}".as_slice()),
            SourceFile::from_bytes("README", b"hello\n".as_slice()),
            SourceFile::from_bytes(
                "lib/m.py",
                b"class M:\n    def f(self):\n        pass\n".as_slice(),
            ),
        ]
    }

    #[test]
    fn test_batch_routes_each_file() {
        let registry = ChunkerRegistry::with_defaults().unwrap();
        let outcomes = chunk_files(
            &registry,
            &files(),
            &ChunkContext::new(),
            &MinifiedThresholds::default(),
            Route::Generic,
        );

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].path, "pkg/a.go");
        assert_eq!(outcomes[0].strategy, StrategyKind::Generic);

        assert!(outcomes[1].minified);
        assert_eq!(outcomes[1].strategy, StrategyKind::Fallback);
        let min = outcomes[1].result.as_ref().unwrap();
        assert_eq!(min.chunks.len(), 1);

        assert_eq!(outcomes[2].strategy, StrategyKind::Fallback);

        let py = outcomes[3].result.as_ref().unwrap();
        assert_eq!(py.count(ChunkLevel::Method), 1);
    }

    #[test]
    fn test_batch_legacy_route() {
        let registry = ChunkerRegistry::with_defaults().unwrap();
        let outcomes = chunk_files(
            &registry,
            &files(),
            &ChunkContext::new(),
            &MinifiedThresholds::default(),
            Route::Legacy,
        );

        assert_eq!(outcomes[0].strategy, StrategyKind::Legacy);
        assert_eq!(outcomes[3].strategy, StrategyKind::Legacy);
        // No legacy chunker for the README, fall through to pick
        assert_eq!(outcomes[2].strategy, StrategyKind::Fallback);
    }

    #[test]
    fn test_batch_failure_is_isolated() {
        let registry = ChunkerRegistry::with_defaults().unwrap();
        let mut batch = files();
        batch.push(SourceFile::new("", b"orphan".as_slice(), "text"));

        let outcomes = chunk_files(
            &registry,
            &batch,
            &ChunkContext::new(),
            &MinifiedThresholds::default(),
            Route::Generic,
        );

        assert!(matches!(
            outcomes[4].result,
            Err(ChunkerError::InvalidFile(_))
        ));
        assert!(outcomes[..4].iter().all(|o| o.result.is_ok()));
    }

    #[test]
    fn test_batch_cancelled() {
        let registry = ChunkerRegistry::with_defaults().unwrap();
        let ctx = ChunkContext::new();
        ctx.cancel();

        let outcomes = chunk_files(
            &registry,
            &files(),
            &ctx,
            &MinifiedThresholds::default(),
            Route::Generic,
        );
        assert!(outcomes.iter().all(|o| matches!(o.result, Err(ChunkerError::Cancelled))));
    }
}
