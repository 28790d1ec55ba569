//! Core data model shared by every chunking strategy.

mod chunk;
mod source;

pub use chunk::*;
pub use source::*;
