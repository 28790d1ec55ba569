//! Hand-written per-language chunkers.
//!
//! These predate the table-driven [`GenericChunker`](super::GenericChunker) and
//! are kept only to cross-validate it: for the same input both paths must agree
//! on chunk counts, names and hierarchy. New languages go into a
//! classification table, not here.

mod go;
mod java;
mod python;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::types::{Chunk, ChunkResult, SourceFile};

use super::chunk::{file_chunk, is_blank};
use super::context::ChunkContext;
use super::error::ChunkerError;
use super::language::{Chunker, Language};

pub use go::GoChunker;
pub use java::JavaChunker;
pub use python::PythonChunker;

/// Get the legacy chunker for a language, if one exists.
pub fn get_legacy_chunker(language: Language) -> Option<Box<dyn Chunker>> {
    match language {
        Language::Go => Some(Box::new(GoChunker::new())),
        Language::Java => Some(Box::new(JavaChunker::new())),
        Language::Python => Some(Box::new(PythonChunker::new())),
        _ => None,
    }
}

fn create_parser(language: Language) -> Result<Parser, ChunkerError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|e| ChunkerError::TreeSitter(e.to_string()))?;
    Ok(parser)
}

/// What a visitor wants done below the node it was shown.
enum Step {
    /// Walk the children under the current enclosing chunk.
    Descend,
    /// Walk the children with this chunk as their enclosing chunk.
    Enter(String),
    /// Leave the subtree unvisited.
    Skip,
}

/// Enclosing chunk ids handed to a visitor.
struct Scope<'a> {
    root: &'a str,
    enclosing: &'a str,
}

/// Shared driver: cancellation, blank input, parsing and the file chunk.
///
/// `visit` sees every node in pre-order and appends the declarations it finds.
/// The walk is cursor-driven, so deep trees cannot exhaust the stack.
fn extract_chunks<F>(
    language: Language,
    file: &SourceFile,
    ctx: &ChunkContext,
    mut visit: F,
) -> Result<ChunkResult, ChunkerError>
where
    F: FnMut(Node, &Scope<'_>, &mut Vec<Chunk>) -> Step,
{
    ctx.check()?;

    if is_blank(&file.content) {
        return Ok(ChunkResult::empty(file));
    }

    let mut parser = create_parser(language)?;
    let tree = parser.parse(&file.content[..], None).ok_or_else(|| {
        ChunkerError::ParseError(format!("failed to parse {} source", language.name()))
    })?;
    ctx.check()?;

    let root = file_chunk(file, language.id())?;
    let root_id = root.id.clone();
    let mut chunks = vec![root];

    let mut cursor = tree.root_node().walk();
    let mut enclosing: Vec<String> = Vec::new();
    // One entry per level descended into: whether it opened a new scope
    let mut entered: Vec<bool> = Vec::new();

    'walk: loop {
        let scope = Scope {
            root: &root_id,
            enclosing: enclosing.last().map_or(root_id.as_str(), String::as_str),
        };
        let (descend, opened) = match visit(cursor.node(), &scope, &mut chunks) {
            Step::Descend => (true, None),
            Step::Enter(id) => (true, Some(id)),
            Step::Skip => (false, None),
        };

        if descend && cursor.goto_first_child() {
            entered.push(opened.is_some());
            enclosing.extend(opened);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
            if entered.pop() == Some(true) {
                enclosing.pop();
            }
        }
    }

    debug!(path = %file.path, language = language.id(), chunks = chunks.len(), "legacy extraction");

    Ok(ChunkResult {
        file: file.clone(),
        chunks,
        errors: Vec::new(),
    })
}
