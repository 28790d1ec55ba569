use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceFile;

/// A semantic unit of a source file, ready for indexing or embedding.
///
/// # Identity
/// - `id` depends only on position and naming (path, lines, level, language, name),
///   so edits inside a body keep the id stable across re-parses.
/// - `content_hash` depends only on `content` and flags body changes under a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,

    // -- Location --
    pub file_path: String,
    /// Start line (1-indexed, inclusive)
    pub start_line: u32,
    /// End line (1-indexed, inclusive)
    pub end_line: u32,
    pub start_byte: usize,
    pub end_byte: usize,

    // -- Semantic Info --
    pub level: ChunkLevel,
    pub language: String,
    /// Declared name; the file path for file-level chunks
    pub name: String,
    /// Trimmed first line of `content`
    pub signature: String,
    /// Enclosing chunk id; `None` only for the file-level chunk
    pub parent_id: Option<String>,

    // -- Content --
    pub content: String,
    pub content_hash: String,
    pub last_modified: DateTime<Utc>,
}

impl Chunk {
    pub fn is_root(&self) -> bool {
        self.level == ChunkLevel::File && self.parent_id.is_none()
    }
}

/// Granularity of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkLevel {
    File,
    Class,
    Method,
}

impl ChunkLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkLevel::File => "file",
            ChunkLevel::Class => "class",
            ChunkLevel::Method => "method",
        }
    }
}

impl std::fmt::Display for ChunkLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChunkLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ChunkLevel::File),
            "class" => Ok(ChunkLevel::Class),
            "method" | "function" | "fn" => Ok(ChunkLevel::Method),
            _ => Err(format!("unknown chunk level: {}", s)),
        }
    }
}

/// Output of one extraction call over one file.
///
/// Chunks are kept in traversal order: the file chunk first, then every
/// declaration in depth-first pre-order.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkResult {
    pub file: SourceFile,
    pub chunks: Vec<Chunk>,
    /// Non-fatal whole-file anomalies a strategy chose to surface.
    pub errors: Vec<String>,
}

impl ChunkResult {
    pub fn empty(file: &SourceFile) -> Self {
        Self {
            file: file.clone(),
            chunks: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The root of the hierarchy, if any chunk was produced.
    pub fn file_chunk(&self) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.is_root())
    }

    pub fn count(&self, level: ChunkLevel) -> usize {
        self.chunks.iter().filter(|c| c.level == level).count()
    }

    /// First chunk with the given level and name.
    pub fn find(&self, level: ChunkLevel, name: &str) -> Option<&Chunk> {
        self.chunks
            .iter()
            .find(|c| c.level == level && c.name == name)
    }

    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    pub fn parent_of(&self, chunk: &Chunk) -> Option<&Chunk> {
        chunk.parent_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Chunk> + 'a {
        self.chunks
            .iter()
            .filter(move |c| c.parent_id.as_deref() == Some(id))
    }

    /// Check the hierarchy invariant: exactly one parentless file chunk, and every
    /// other chunk's parent resolves within this result.
    ///
    /// An empty result is valid.
    pub fn validate_hierarchy(&self) -> Result<(), String> {
        if self.chunks.is_empty() {
            return Ok(());
        }

        let roots = self.chunks.iter().filter(|c| c.is_root()).count();
        if roots != 1 {
            return Err(format!("expected exactly one file chunk, found {}", roots));
        }

        for chunk in &self.chunks {
            if chunk.is_root() {
                continue;
            }
            if chunk.level == ChunkLevel::File {
                return Err(format!("file-level chunk {} has a parent", chunk.id));
            }
            match chunk.parent_id.as_deref() {
                None => return Err(format!("{} chunk '{}' has no parent", chunk.level, chunk.name)),
                Some(parent) if self.get(parent).is_none() => {
                    return Err(format!(
                        "{} chunk '{}' references unknown parent {}",
                        chunk.level, chunk.name, parent
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, level: ChunkLevel, name: &str, parent: Option<&str>) -> Chunk {
        Chunk {
            id: id.to_string(),
            file_path: "src/lib.rs".to_string(),
            start_line: 1,
            end_line: 3,
            start_byte: 0,
            end_byte: 10,
            level,
            language: "rust".to_string(),
            name: name.to_string(),
            signature: String::new(),
            parent_id: parent.map(str::to_string),
            content: "x".to_string(),
            content_hash: String::new(),
            last_modified: Utc::now(),
        }
    }

    fn result(chunks: Vec<Chunk>) -> ChunkResult {
        let file = SourceFile::new("src/lib.rs", b"x".as_slice(), "rust");
        ChunkResult {
            file,
            chunks,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_chunk_level_from_str() {
        assert_eq!("file".parse::<ChunkLevel>().unwrap(), ChunkLevel::File);
        assert_eq!("Class".parse::<ChunkLevel>().unwrap(), ChunkLevel::Class);
        assert_eq!("METHOD".parse::<ChunkLevel>().unwrap(), ChunkLevel::Method);
        assert_eq!("fn".parse::<ChunkLevel>().unwrap(), ChunkLevel::Method);
        assert!("module".parse::<ChunkLevel>().is_err());
        assert!("".parse::<ChunkLevel>().is_err());
    }

    #[test]
    fn test_chunk_level_display() {
        assert_eq!(format!("{}", ChunkLevel::File), "file");
        assert_eq!(format!("{}", ChunkLevel::Method), "method");
    }

    #[test]
    fn test_chunk_level_serde_lowercase() {
        let json = serde_json::to_string(&ChunkLevel::Class).unwrap();
        assert_eq!(json, "\"class\"");
    }

    #[test]
    fn test_validate_hierarchy_ok() {
        let r = result(vec![
            chunk("f", ChunkLevel::File, "src/lib.rs", None),
            chunk("c", ChunkLevel::Class, "Point", Some("f")),
            chunk("m", ChunkLevel::Method, "new", Some("c")),
        ]);
        assert!(r.validate_hierarchy().is_ok());
        assert_eq!(r.children_of("f").count(), 1);
        assert_eq!(r.parent_of(&r.chunks[2]).unwrap().name, "Point");
    }

    #[test]
    fn test_validate_hierarchy_dangling_parent() {
        let r = result(vec![
            chunk("f", ChunkLevel::File, "src/lib.rs", None),
            chunk("m", ChunkLevel::Method, "orphan", Some("missing")),
        ]);
        assert!(r.validate_hierarchy().is_err());
    }

    #[test]
    fn test_validate_hierarchy_two_roots() {
        let r = result(vec![
            chunk("f", ChunkLevel::File, "src/lib.rs", None),
            chunk("g", ChunkLevel::File, "src/lib.rs", None),
        ]);
        assert!(r.validate_hierarchy().is_err());
    }

    #[test]
    fn test_validate_hierarchy_empty_is_valid() {
        assert!(result(Vec::new()).validate_hierarchy().is_ok());
    }
}
