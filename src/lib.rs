//! Semantic chunking of source files for code indexing.
//!
//! Turns a source file into a hierarchy of chunks (file, class-like,
//! method-like) with stable identities, using one generic tree-sitter walk
//! driven by per-language classification tables.

pub mod chunker;
pub mod config;
pub mod minified;
pub mod types;

pub use chunker::{
    ChunkContext, Chunker, ChunkerError, ChunkerRegistry, ClassificationTable, GenericChunker,
};
pub use config::ChunkerConfig;
pub use minified::{MinifiedThresholds, is_minified, is_minified_with};
pub use types::{Chunk, ChunkLevel, ChunkResult, SourceFile};
