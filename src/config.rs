//! Chunker configuration.
//!
//! Config is stored at `~/.config/idxc/config.toml` and contains:
//! - Minification thresholds
//! - Class nesting policy
//! - Extra or replacement classification tables
//!
//! ```toml
//! class_nesting = "flat"
//!
//! [minified]
//! max_line_len = 8192
//!
//! [[tables]]
//! language = "go"
//! class_types = ["type_spec"]
//! method_types = ["function_declaration", "method_declaration"]
//! extensions = ["go"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chunker::{ChunkOptions, ClassNesting, ClassificationTable};
use crate::minified::MinifiedThresholds;

const CONFIG_DIR: &str = "idxc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    #[serde(default)]
    pub class_nesting: ClassNesting,

    #[serde(default)]
    pub minified: MinifiedThresholds,

    /// Tables layered over the built-in ones; same language id replaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<ClassificationTable>,
}

impl ChunkerConfig {
    /// Load config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        for table in &config.tables {
            table
                .validate()
                .with_context(|| format!("Invalid table in {}", path.display()))?;
        }

        Ok(config)
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        ChunkOptions {
            class_nesting: self.class_nesting,
        }
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}
