//! Chunk extraction using tree-sitter.
//!
//! This module provides:
//! - A table-driven generic chunker shared by every language
//! - Hand-written legacy chunkers for cross-validation
//! - A file-level fallback for everything else
//! - A registry routing file extensions to the right strategy

mod batch;
mod chunk;
mod classification;
mod context;
mod engine;
mod error;
mod fallback;
mod generic;
pub mod identity;
mod language;
pub mod legacy;
mod registry;

pub use batch::{FileOutcome, Route, chunk_files};
pub use chunk::ChunkBuilder;
pub use classification::{ClassificationTable, DEFAULT_NAME_FIELD};
pub use context::ChunkContext;
pub use engine::{ParseEngine, TreeSitterEngine};
pub use error::ChunkerError;
pub use fallback::FallbackChunker;
pub use generic::{ChunkOptions, ClassNesting, GenericChunker, GenericChunkerBuilder};
pub use language::{Chunker, Language, StrategyKind};
pub use registry::ChunkerRegistry;
