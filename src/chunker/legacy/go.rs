use tree_sitter::Node;

use crate::types::{Chunk, ChunkLevel, ChunkResult, SourceFile};

use crate::chunker::chunk::node_chunk;
use crate::chunker::context::ChunkContext;
use crate::chunker::error::ChunkerError;
use crate::chunker::language::{Chunker, Language, StrategyKind};

use super::{Scope, Step};

/// Legacy chunker for Go.
///
/// Go declares methods beside their receiver type rather than inside it, so
/// every function and method hangs off the file chunk, as do type specs.
pub struct GoChunker {
    _marker: (),
}

impl GoChunker {
    pub fn new() -> Self {
        Self { _marker: () }
    }

    fn visit_node(
        &self,
        node: Node,
        file: &SourceFile,
        scope: &Scope<'_>,
        chunks: &mut Vec<Chunk>,
    ) -> Step {
        match node.kind() {
            // Bodies are not searched: closures are not declarations
            "function_declaration" | "method_declaration" => {
                if let Some(chunk) = self.extract(node, file, ChunkLevel::Method, scope.root) {
                    chunks.push(chunk);
                }
                Step::Skip
            }
            // Struct and interface bodies hold no function declarations, so a
            // named type has nothing further to collect under it.
            "type_spec" => match self.extract(node, file, ChunkLevel::Class, scope.root) {
                Some(chunk) => {
                    chunks.push(chunk);
                    Step::Skip
                }
                None => Step::Descend,
            },
            _ => Step::Descend,
        }
    }

    fn extract(
        &self,
        node: Node,
        file: &SourceFile,
        level: ChunkLevel,
        parent: &str,
    ) -> Option<Chunk> {
        node_chunk(node, file, Language::Go.id(), level, "name", parent)
    }
}

impl Default for GoChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for GoChunker {
    fn chunk(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        super::extract_chunks(Language::Go, file, ctx, |node, scope, chunks| {
            self.visit_node(node, file, scope, chunks)
        })
    }

    fn language(&self) -> &str {
        Language::Go.id()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Legacy
    }
}
