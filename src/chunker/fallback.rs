use tracing::debug;

use crate::types::{ChunkResult, PLAIN_TEXT, SourceFile};

use super::chunk::{file_chunk, is_blank};
use super::context::ChunkContext;
use super::error::ChunkerError;
use super::language::{Chunker, StrategyKind};

/// Emits a single file-level chunk for any non-blank input.
///
/// Used for every extension without a dedicated strategy, and by callers for
/// content that is not worth parsing (minified bundles, generated code).
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackChunker;

impl FallbackChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for FallbackChunker {
    fn chunk(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        ctx.check()?;

        if is_blank(&file.content) {
            return Ok(ChunkResult::empty(file));
        }

        let language = if file.language.is_empty() {
            PLAIN_TEXT
        } else {
            file.language.as_str()
        };
        let root = file_chunk(file, language)?;
        debug!(path = %file.path, lines = root.end_line, "file-level chunk only");

        Ok(ChunkResult {
            file: file.clone(),
            chunks: vec![root],
            errors: Vec::new(),
        })
    }

    fn language(&self) -> &str {
        PLAIN_TEXT
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }
}
