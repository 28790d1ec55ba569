use std::collections::HashMap;

use tree_sitter::{Parser, Tree};

use super::error::ChunkerError;
use super::language::Language;

/// Produces error-tolerant syntax trees.
///
/// Malformed input yields a best-effort tree with error nodes; only a missing
/// grammar or an engine failure is an error.
#[cfg_attr(test, mockall::automock)]
pub trait ParseEngine: Send + Sync {
    fn parse(&self, language: &str, source: &[u8]) -> Result<Tree, ChunkerError>;

    fn supports(&self, language: &str) -> bool;
}

/// Tree-sitter backed parse engine.
///
/// Holds only grammars; every parse call builds its own `Parser`, so one
/// engine can be shared across threads.
#[derive(Default, Clone)]
pub struct TreeSitterEngine {
    grammars: HashMap<String, tree_sitter::Language>,
}

impl TreeSitterEngine {
    /// An engine with no grammars registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with every bundled grammar registered under its language id.
    pub fn with_builtin_grammars() -> Self {
        let mut engine = Self::new();
        for lang in Language::ALL {
            engine.register(lang.id(), lang.grammar());
        }
        engine
    }

    pub fn register(&mut self, language: impl Into<String>, grammar: tree_sitter::Language) {
        self.grammars.insert(language.into(), grammar);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    fn create_parser(&self, language: &str) -> Result<Parser, ChunkerError> {
        let grammar = self
            .grammars
            .get(language)
            .ok_or_else(|| ChunkerError::UnsupportedLanguage(language.to_string()))?;

        let mut parser = Parser::new();
        parser
            .set_language(grammar)
            .map_err(|e| ChunkerError::TreeSitter(e.to_string()))?;
        Ok(parser)
    }
}

impl std::fmt::Debug for TreeSitterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<_> = self.languages().collect();
        languages.sort_unstable();
        f.debug_struct("TreeSitterEngine")
            .field("languages", &languages)
            .finish()
    }
}

impl ParseEngine for TreeSitterEngine {
    fn parse(&self, language: &str, source: &[u8]) -> Result<Tree, ChunkerError> {
        let mut parser = self.create_parser(language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| ChunkerError::ParseError(format!("failed to parse {} source", language)))
    }

    fn supports(&self, language: &str) -> bool {
        self.grammars.contains_key(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_grammars_registered() {
        let engine = TreeSitterEngine::with_builtin_grammars();
        for lang in Language::ALL {
            assert!(engine.supports(lang.id()), "{} missing", lang.id());
        }
        assert!(!engine.supports("cobol"));
    }

    #[test]
    fn test_parse_go() {
        let engine = TreeSitterEngine::with_builtin_grammars();
        let tree = engine.parse("go", b"package main\n\nfunc main() {}\n").unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_is_error_tolerant() {
        let engine = TreeSitterEngine::with_builtin_grammars();
        let tree = engine.parse("python", b"def broken(:\n    pass\n").unwrap();
        assert!(tree.root_node().has_error());
    }

    #[test]
    fn test_unregistered_grammar() {
        let engine = TreeSitterEngine::new();
        let err = engine.parse("go", b"package main").unwrap_err();
        assert!(err.is_unsupported());
    }
}
