use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ChunkerConfig;
use crate::types::extension_of;

use super::classification::ClassificationTable;
use super::engine::{ParseEngine, TreeSitterEngine};
use super::error::ChunkerError;
use super::fallback::FallbackChunker;
use super::generic::{ChunkOptions, GenericChunker};
use super::language::{Chunker, Language};
use super::legacy::get_legacy_chunker;

/// Maps file extensions to chunking strategies.
///
/// Built once, then read concurrently without locking. Generic chunkers are
/// the preferred path for every extension; legacy chunkers are reachable only
/// through [`ChunkerRegistry::legacy`] for cross-validation.
pub struct ChunkerRegistry {
    generic: HashMap<String, Arc<dyn Chunker>>,
    legacy: HashMap<String, Arc<dyn Chunker>>,
    fallback: FallbackChunker,
}

impl ChunkerRegistry {
    /// Build a registry with one generic chunker per table.
    ///
    /// A later table for the same language replaces an earlier one, and a later
    /// claim on an extension wins. Legacy chunkers are attached for every
    /// bundled language that has one.
    pub fn new(
        engine: Arc<dyn ParseEngine>,
        tables: Vec<ClassificationTable>,
        options: ChunkOptions,
    ) -> Result<Self, ChunkerError> {
        let mut by_language: Vec<ClassificationTable> = Vec::new();
        for table in tables {
            match by_language.iter_mut().find(|t| t.language == table.language) {
                Some(existing) => *existing = table,
                None => by_language.push(table),
            }
        }

        let mut generic: HashMap<String, Arc<dyn Chunker>> = HashMap::new();
        for table in by_language {
            if !engine.supports(&table.language) {
                return Err(ChunkerError::Configuration(format!(
                    "no grammar registered for language '{}'",
                    table.language
                )));
            }

            let extensions: Vec<String> = table.extensions.iter().map(|e| normalize(e)).collect();
            let chunker: Arc<dyn Chunker> = Arc::new(
                GenericChunker::builder()
                    .table(table)
                    .engine(Arc::clone(&engine))
                    .options(options)
                    .build()?,
            );
            for ext in extensions {
                debug!(
                    extension = %ext,
                    language = chunker.language(),
                    "registered generic chunker"
                );
                generic.insert(ext, Arc::clone(&chunker));
            }
        }

        let mut legacy: HashMap<String, Arc<dyn Chunker>> = HashMap::new();
        for lang in Language::ALL {
            if let Some(chunker) = get_legacy_chunker(lang) {
                let chunker: Arc<dyn Chunker> = Arc::from(chunker);
                for ext in lang.extensions() {
                    legacy.insert(normalize(ext), Arc::clone(&chunker));
                }
            }
        }

        info!(
            generic = generic.len(),
            legacy = legacy.len(),
            "chunker registry ready"
        );

        Ok(Self {
            generic,
            legacy,
            fallback: FallbackChunker::new(),
        })
    }

    /// Registry over every bundled grammar with the built-in tables.
    pub fn with_defaults() -> Result<Self, ChunkerError> {
        Self::new(
            Arc::new(TreeSitterEngine::with_builtin_grammars()),
            ClassificationTable::builtins(),
            ChunkOptions::default(),
        )
    }

    /// Registry using the built-in tables overlaid with those from config.
    pub fn from_config(config: &ChunkerConfig) -> Result<Self, ChunkerError> {
        let mut tables = ClassificationTable::builtins();
        tables.extend(config.tables.iter().cloned());
        Self::new(
            Arc::new(TreeSitterEngine::with_builtin_grammars()),
            tables,
            config.chunk_options(),
        )
    }

    /// Strategy for an extension. Never fails: unknown extensions get the fallback.
    pub fn pick(&self, extension: &str) -> &dyn Chunker {
        match self.generic.get(&normalize(extension)) {
            Some(chunker) => &**chunker,
            None => &self.fallback,
        }
    }

    /// Strategy for a file path, by its extension.
    pub fn pick_for_path(&self, path: &str) -> &dyn Chunker {
        match extension_of(path) {
            Some(ext) => self.pick(&ext),
            None => &self.fallback,
        }
    }

    /// Legacy reference chunker for an extension, if one exists.
    pub fn legacy(&self, extension: &str) -> Option<&dyn Chunker> {
        self.legacy.get(&normalize(extension)).map(|c| &**c)
    }

    pub fn fallback(&self) -> &dyn Chunker {
        &self.fallback
    }

    /// Extensions with a generic chunker, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.generic.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

impl std::fmt::Debug for ChunkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkerRegistry")
            .field("extensions", &self.extensions())
            .field("legacy", &self.legacy.len())
            .finish()
    }
}

fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
