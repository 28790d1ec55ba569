//! CLI command implementations.

mod chunk;
mod config;
mod languages;
mod minified;

pub use chunk::ChunkCmd;
pub use config::ConfigCmd;
pub use languages::LanguagesCmd;
pub use minified::MinifiedCmd;
