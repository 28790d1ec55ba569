//! Table-driven chunk extraction shared by every language.
//!
//! The walk is a depth-first pre-order traversal carrying an explicit stack of
//! enclosing chunk ids. The syntax tree itself is never modified.
//!
//! Parent resolution is lexical:
//! - a method takes the innermost class chunk whose body contains it, or the
//!   file chunk when no class encloses it (Go methods sit beside their type)
//! - with [`ClassNesting::Flat`] every class is parented to the file chunk,
//!   while methods still nest under the class that lexically contains them
//! - a class-like node with no name emits nothing, but its children are
//!   still walked with the current enclosing chunk
//! - methods are leaves; nothing below them is visited
//!
//! Descent uses a tree cursor rather than recursion, so nesting depth is
//! bounded by the heap, not the thread stack.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use tree_sitter::Node;

use crate::types::{Chunk, ChunkLevel, ChunkResult, SourceFile};

use super::chunk::{file_chunk, is_blank, node_chunk};
use super::classification::ClassificationTable;
use super::context::ChunkContext;
use super::error::ChunkerError;
use super::engine::ParseEngine;
use super::language::{Chunker, StrategyKind};

/// How nested class-like declarations are parented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassNesting {
    /// Every class chunk is parented to the file chunk.
    #[default]
    Flat,
    /// A class chunk is parented to the class that lexically encloses it.
    Nested,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    #[serde(default)]
    pub class_nesting: ClassNesting,
}

/// Generic chunker parameterised by a classification table.
#[derive(Clone)]
pub struct GenericChunker {
    table: Arc<ClassificationTable>,
    engine: Arc<dyn ParseEngine>,
    options: ChunkOptions,
}

#[derive(Default)]
pub struct GenericChunkerBuilder {
    table: Option<Arc<ClassificationTable>>,
    engine: Option<Arc<dyn ParseEngine>>,
    options: ChunkOptions,
}

impl GenericChunkerBuilder {
    pub fn table(mut self, table: impl Into<Arc<ClassificationTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn engine(mut self, engine: Arc<dyn ParseEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn options(mut self, options: ChunkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<GenericChunker, ChunkerError> {
        let table = self
            .table
            .ok_or_else(|| ChunkerError::Configuration("classification table is required".into()))?;
        let engine = self
            .engine
            .ok_or_else(|| ChunkerError::Configuration("parse engine is required".into()))?;
        table.validate()?;

        Ok(GenericChunker {
            table,
            engine,
            options: self.options,
        })
    }
}

impl GenericChunker {
    pub fn builder() -> GenericChunkerBuilder {
        GenericChunkerBuilder::default()
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    pub fn options(&self) -> ChunkOptions {
        self.options
    }

    fn extract(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        ctx.check()?;

        if is_blank(&file.content) {
            debug!(path = %file.path, "blank file, nothing to chunk");
            return Ok(ChunkResult::empty(file));
        }

        let language = self.table.language.as_str();
        let tree = self.engine.parse(language, &file.content)?;
        ctx.check()?;

        let root = file_chunk(file, language)?;
        let mut walk = Walk::new(&self.table, self.options, file, root);
        walk.run(tree.root_node());

        debug!(
            path = %file.path,
            language,
            chunks = walk.chunks.len(),
            has_errors = tree.root_node().has_error(),
            "extracted chunks"
        );

        Ok(ChunkResult {
            file: file.clone(),
            chunks: walk.chunks,
            errors: Vec::new(),
        })
    }
}

impl std::fmt::Debug for GenericChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericChunker")
            .field("language", &self.table.language)
            .field("options", &self.options)
            .finish()
    }
}

impl Chunker for GenericChunker {
    fn chunk(&self, file: &SourceFile, ctx: &ChunkContext) -> Result<ChunkResult, ChunkerError> {
        self.extract(file, ctx)
    }

    fn language(&self) -> &str {
        &self.table.language
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Generic
    }
}

/// State of one traversal.
struct Walk<'a> {
    table: &'a ClassificationTable,
    options: ChunkOptions,
    file: &'a SourceFile,
    /// Enclosing chunk ids; the bottom entry is the file chunk.
    stack: Vec<String>,
    chunks: Vec<Chunk>,
}

impl<'a> Walk<'a> {
    fn new(
        table: &'a ClassificationTable,
        options: ChunkOptions,
        file: &'a SourceFile,
        root: Chunk,
    ) -> Self {
        Self {
            table,
            options,
            file,
            stack: vec![root.id.clone()],
            chunks: vec![root],
        }
    }

    fn root_id(&self) -> &str {
        &self.stack[0]
    }

    fn top_id(&self) -> &str {
        self.stack.last().map_or(self.root_id(), String::as_str)
    }

    fn run(&mut self, root: Node) {
        let mut cursor = root.walk();
        // One entry per level descended into: whether that node pushed a class
        let mut entered: Vec<bool> = Vec::new();

        loop {
            if let Some(pushed) = self.enter(cursor.node()) {
                if cursor.goto_first_child() {
                    entered.push(pushed);
                    continue;
                }
                if pushed {
                    self.stack.pop();
                }
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
                if entered.pop() == Some(true) {
                    self.stack.pop();
                }
            }
        }
    }

    /// Classify one node. `None` leaves its subtree unvisited; otherwise the
    /// flag tells whether a class chunk was pushed onto the stack.
    fn enter(&mut self, node: Node) -> Option<bool> {
        let kind = node.kind();

        if self.table.is_class_like(kind) {
            let parent = match self.options.class_nesting {
                ClassNesting::Flat => self.root_id(),
                ClassNesting::Nested => self.top_id(),
            };
            // Nameless containers are walked through without a chunk
            Some(match self.extract(node, ChunkLevel::Class, parent) {
                Some(chunk) => {
                    self.stack.push(chunk.id.clone());
                    self.chunks.push(chunk);
                    true
                }
                None => false,
            })
        } else if self.table.is_method_like(kind) {
            let parent = self.top_id();
            if let Some(chunk) = self.extract(node, ChunkLevel::Method, parent) {
                self.chunks.push(chunk);
            }
            None
        } else {
            Some(false)
        }
    }

    fn extract(&self, node: Node, level: ChunkLevel, parent: &str) -> Option<Chunk> {
        let chunk = node_chunk(
            node,
            self.file,
            &self.table.language,
            level,
            &self.table.name_field,
            parent,
        );
        if chunk.is_none() {
            trace!(
                kind = node.kind(),
                line = node.start_position().row + 1,
                "skipping declaration without a usable name or position"
            );
        }
        chunk
    }
}
