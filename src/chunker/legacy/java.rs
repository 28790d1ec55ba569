use tree_sitter::Node;

use crate::types::{Chunk, ChunkLevel, ChunkResult, SourceFile};

use crate::chunker::chunk::node_chunk;
use crate::chunker::context::ChunkContext;
use crate::chunker::error::ChunkerError;
use crate::chunker::language::{Chunker, Language, StrategyKind};

use super::{Scope, Step};

/// Legacy chunker for Java.
///
/// Type declarations (class, interface, enum, record, annotation type) all
/// hang off the file chunk, even when nested. Methods and constructors hang
/// off the type whose body contains them.
pub struct JavaChunker {
    _marker: (),
}

impl JavaChunker {
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
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => {
                match self.extract(node, file, ChunkLevel::Class, scope.root) {
                    Some(chunk) => {
                        let id = chunk.id.clone();
                        chunks.push(chunk);
                        Step::Enter(id)
                    }
                    None => Step::Descend,
                }
            }
            "method_declaration" | "constructor_declaration" => {
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
        node_chunk(node, file, Language::Java.id(), level, "name", parent)
    }
}

impl Default for JavaChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for JavaChunker {
    fn chunk(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        super::extract_chunks(Language::Java, file, ctx, |node, scope, chunks| {
            self.visit_node(node, file, scope, chunks)
        })
    }

    fn language(&self) -> &str {
        Language::Java.id()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(path: &str, source: &str) -> ChunkResult {
        let file = SourceFile::new(path, source.as_bytes(), "java");
        JavaChunker::new().chunk(&file, &ChunkContext::new()).unwrap()
    }

    #[test]
    fn test_parse_public_method() {
        let result = chunk(
            "Calculator.java",
            r#"
public class Calculator {
    /**
     * Adds two numbers.
     */
    public int add(int a, int b) {
        return a + b;
    }
}
"#,
        );

        let class = result.find(ChunkLevel::Class, "Calculator").unwrap();
        let method = result.find(ChunkLevel::Method, "add").unwrap();
        assert_eq!(method.parent_id.as_deref(), Some(class.id.as_str()));
        assert_eq!(method.signature, "public int add(int a, int b) {");
    }

    #[test]
    fn test_parse_interface() {
        let result = chunk(
            "Service.java",
            r#"
/**
 * Service interface.
 */
public interface Service {
    void execute();
}
"#,
        );

        let iface = result.find(ChunkLevel::Class, "Service").unwrap();
        assert_eq!(iface.signature, "public interface Service {");
        assert_eq!(result.children_of(&iface.id).count(), 1);
    }

    #[test]
    fn test_nested_class_is_flattened() {
        let result = chunk(
            "Outer.java",
            r#"class Outer {
    class Inner {
        void work() {}
    }
}
"#,
        );

        let inner = result.find(ChunkLevel::Class, "Inner").unwrap();
        assert_eq!(result.parent_of(inner).unwrap().level, ChunkLevel::File);
        let work = result.find(ChunkLevel::Method, "work").unwrap();
        assert_eq!(result.parent_of(work).unwrap().name, "Inner");
    }
}
