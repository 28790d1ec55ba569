use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkerError {
    /// A required collaborator (classification table, parse engine) is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("chunking cancelled")]
    Cancelled,

    #[error("chunking deadline exceeded")]
    DeadlineExceeded,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("tree-sitter error: {0}")]
    TreeSitter(String),

    #[error("invalid file: {0}")]
    InvalidFile(String),
}

impl ChunkerError {
    /// True for cancellation and deadline errors.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ChunkerError::Cancelled | ChunkerError::DeadlineExceeded)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ChunkerError::UnsupportedLanguage(_))
    }
}
