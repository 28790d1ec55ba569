use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chunker::Language;

/// Language tag used when the extension maps to no known language.
pub const PLAIN_TEXT: &str = "text";

/// A source file handed over by the discovery layer. Immutable once built.
///
/// Content is reference-counted so a `ChunkResult` can carry its originating
/// file without copying the bytes.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: String,
    #[serde(skip)]
    pub content: Arc<[u8]>,
    pub language: String,
    pub modified: DateTime<Utc>,
}

impl SourceFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<Arc<[u8]>>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: language.into(),
            modified: Utc::now(),
        }
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    /// Build from bytes already read by the caller, deriving the language tag
    /// from the file extension.
    pub fn from_bytes(path: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        let path = path.into();
        let language = language_tag(&path);
        Self::new(path, content, language)
    }

    /// Read a file from disk, taking its modification time from metadata.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let modified = std::fs::metadata(path)?
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self::from_bytes(path.to_string_lossy().into_owned(), content).with_modified(modified))
    }

    /// Lowercased extension without the leading dot, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Lowercased extension of the final path component.
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn language_tag(path: &str) -> String {
    Language::from_path(path)
        .map(|lang| lang.id().to_string())
        .unwrap_or_else(|| PLAIN_TEXT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_bytes_detects_language() {
        let file = SourceFile::from_bytes("pkg/server.go", b"package main".as_slice());
        assert_eq!(file.language, "go");

        let file = SourceFile::from_bytes("notes/README", b"hello".as_slice());
        assert_eq!(file.language, PLAIN_TEXT);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("src/Main.JAVA"), Some("java".to_string()));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("dist/app.min.js"), Some("js".to_string()));
    }

    #[test]
    fn test_read_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        writeln!(tmp, "def main():\n    pass").unwrap();

        let file = SourceFile::read(tmp.path()).unwrap();
        assert_eq!(file.language, "python");
        assert!(!file.is_empty());
        assert!(file.path.ends_with(".py"));
    }

    #[test]
    fn test_clone_shares_content() {
        let file = SourceFile::new("a.rs", b"fn a() {}".as_slice(), "rust");
        let copy = file.clone();
        assert!(Arc::ptr_eq(&file.content, &copy.content));
    }
}
