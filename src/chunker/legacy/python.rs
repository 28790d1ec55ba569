use tree_sitter::Node;

use crate::types::{Chunk, ChunkLevel, ChunkResult, SourceFile};

use crate::chunker::chunk::node_chunk;
use crate::chunker::context::ChunkContext;
use crate::chunker::error::ChunkerError;
use crate::chunker::language::{Chunker, Language, StrategyKind};

use super::{Scope, Step};

/// Legacy chunker for Python.
///
/// Extracts:
/// - Classes (flattened to the file level)
/// - Functions and methods (`def` and `async def`), parented to the class
///   whose body contains them
/// - Decorated definitions, through their wrapped declaration
pub struct PythonChunker {
    _marker: (),
}

impl PythonChunker {
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
            "class_definition" => match self.extract(node, file, ChunkLevel::Class, scope.root) {
                Some(chunk) => {
                    let id = chunk.id.clone();
                    chunks.push(chunk);
                    Step::Enter(id)
                }
                None => Step::Descend,
            },
            "function_definition" => {
                // Nested defs are closures, not declarations
                let parent = scope.enclosing;
                if let Some(chunk) = self.extract(node, file, ChunkLevel::Method, parent) {
                    chunks.push(chunk);
                }
                Step::Skip
            }
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
        node_chunk(node, file, Language::Python.id(), level, "name", parent)
    }
}

impl Default for PythonChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for PythonChunker {
    fn chunk(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        super::extract_chunks(Language::Python, file, ctx, |node, scope, chunks| {
            self.visit_node(node, file, scope, chunks)
        })
    }

    fn language(&self) -> &str {
        Language::Python.id()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str) -> ChunkResult {
        let file = SourceFile::new("mod.py", source.as_bytes(), "python");
        PythonChunker::new().chunk(&file, &ChunkContext::new()).unwrap()
    }

    #[test]
    fn test_parse_async_function() {
        let result = chunk("async def fetch(url):\n    return await get(url)\n");
        let fetch = result.find(ChunkLevel::Method, "fetch").unwrap();
        assert_eq!(fetch.signature, "async def fetch(url):");
    }

    #[test]
    fn test_decorated_method() {
        let result = chunk(
            r#"class Cache:
    @staticmethod
    def build():
        return Cache()
"#,
        );

        let build = result.find(ChunkLevel::Method, "build").unwrap();
        assert_eq!(result.parent_of(build).unwrap().name, "Cache");
        // Decorators sit outside the function_definition node
        assert_eq!(build.signature, "def build():");
    }

    #[test]
    fn test_empty_source() {
        assert!(chunk("").is_empty());
    }
}
