use chrono::{DateTime, Utc};
use tree_sitter::Node;

use crate::types::{Chunk, ChunkLevel, SourceFile};

use super::error::ChunkerError;
use super::identity;

/// Builder for creating Chunks during traversal.
///
/// `build` enforces the chunk invariants and fills in the derived fields
/// (signature, id, content hash). It returns `None` for anything that would
/// violate them, so callers can skip a malformed node and keep going.
#[derive(Debug, Default)]
pub struct ChunkBuilder {
    level: Option<ChunkLevel>,
    name: Option<String>,
    content: Option<String>,
    file_path: Option<String>,
    language: Option<String>,
    parent_id: Option<String>,
    start_line: Option<u32>,
    end_line: Option<u32>,
    start_byte: Option<usize>,
    end_byte: Option<usize>,
    last_modified: Option<DateTime<Utc>>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: ChunkLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn last_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(modified);
        self
    }

    pub fn location(
        mut self,
        start_line: u32,
        end_line: u32,
        start_byte: usize,
        end_byte: usize,
    ) -> Self {
        self.start_line = Some(start_line);
        self.end_line = Some(end_line);
        self.start_byte = Some(start_byte);
        self.end_byte = Some(end_byte);
        self
    }

    pub fn build(self) -> Option<Chunk> {
        let level = self.level?;
        let file_path = self.file_path.filter(|p| !p.is_empty())?;
        let content = self.content.filter(|c| !is_blank(c.as_bytes()))?;
        let start_line = self.start_line.filter(|&l| l >= 1)?;
        let end_line = self.end_line.filter(|&l| l >= start_line)?;
        let name = self.name?;
        let language = self.language.unwrap_or_default();

        // Only the file chunk is a root
        if (level == ChunkLevel::File) != self.parent_id.is_none() {
            return None;
        }

        let id = identity::chunk_id(&file_path, start_line, end_line, level, &language, &name);
        let content_hash = identity::content_hash(&content);
        let signature = content.lines().next().unwrap_or("").trim().to_string();

        Some(Chunk {
            id,
            file_path,
            start_line,
            end_line,
            start_byte: self.start_byte.unwrap_or(0),
            end_byte: self.end_byte.unwrap_or(content.len()),
            level,
            language,
            name,
            signature,
            parent_id: self.parent_id,
            content,
            content_hash,
            last_modified: self.last_modified.unwrap_or_else(Utc::now),
        })
    }
}

/// True when the content has nothing worth chunking (empty or whitespace only).
///
/// Whitespace is Unicode whitespace; invalid UTF-8 counts as content.
pub fn is_blank(content: &[u8]) -> bool {
    String::from_utf8_lossy(content).trim().is_empty()
}

/// Number of lines in the content; a trailing newline does not open a new line.
pub fn line_count(content: &[u8]) -> u32 {
    if content.is_empty() {
        return 0;
    }
    let newlines = content.iter().filter(|&&b| b == b'\n').count();
    let lines = if content.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    };
    u32::try_from(lines).unwrap_or(u32::MAX)
}

/// The root chunk spanning the whole file, named by its path.
pub fn file_chunk(file: &SourceFile, language: &str) -> Result<Chunk, ChunkerError> {
    if file.path.is_empty() {
        return Err(ChunkerError::InvalidFile("empty file path".into()));
    }

    ChunkBuilder::new()
        .level(ChunkLevel::File)
        .name(file.path.as_str())
        .content(String::from_utf8_lossy(&file.content).into_owned())
        .file_path(file.path.as_str())
        .language(language)
        .last_modified(file.modified)
        .location(1, line_count(&file.content).max(1), 0, file.content.len())
        .build()
        .ok_or_else(|| ChunkerError::InvalidFile(format!("{}: no content to chunk", file.path)))
}

/// Name of a declaration node, read from the given field.
pub fn node_name(node: Node, field: &str, source: &[u8]) -> Option<String> {
    let name = node.child_by_field_name(field)?.utf8_text(source).ok()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// 1-based inclusive line range of a node.
///
/// A node whose end sits at column 0 of a later row stops on the previous line.
pub fn node_lines(node: Node) -> (u32, u32) {
    let start = node.start_position();
    let end = node.end_position();
    let end_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    (to_line(start.row), to_line(end_row))
}

fn to_line(row: usize) -> u32 {
    u32::try_from(row).map_or(u32::MAX, |r| r.saturating_add(1))
}

/// Build a class or method chunk for a declaration node.
///
/// Returns `None` when the name field is missing or the node's position or
/// text is unusable.
pub fn node_chunk(
    node: Node,
    file: &SourceFile,
    language: &str,
    level: ChunkLevel,
    name_field: &str,
    parent_id: &str,
) -> Option<Chunk> {
    let name = node_name(node, name_field, &file.content)?;
    let bytes = file.content.get(node.start_byte()..node.end_byte())?;
    let (start_line, end_line) = node_lines(node);

    ChunkBuilder::new()
        .level(level)
        .name(name)
        .content(String::from_utf8_lossy(bytes).into_owned())
        .file_path(file.path.as_str())
        .language(language)
        .parent(parent_id)
        .last_modified(file.modified)
        .location(start_line, end_line, node.start_byte(), node.end_byte())
        .build()
}
