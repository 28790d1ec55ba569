//! Per-language classification tables.
//!
//! A table is the only language-specific input to the generic chunker: which
//! node kinds are class-like, which are method-like, and which field holds a
//! declaration's name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::ChunkerError;
use super::language::Language;

pub const DEFAULT_NAME_FIELD: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTable {
    /// Language identifier, also the grammar key in the parse engine.
    pub language: String,

    /// Node kinds that open a class-like container (class, interface, enum, struct, ...).
    #[serde(default)]
    pub class_types: HashSet<String>,

    /// Node kinds that declare a callable (function, method, constructor).
    #[serde(default)]
    pub method_types: HashSet<String>,

    /// Field holding a declaration's name.
    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// File extensions routed to this table, without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
}

fn default_name_field() -> String {
    DEFAULT_NAME_FIELD.to_string()
}

impl ClassificationTable {
    pub fn new(
        language: impl Into<String>,
        class_types: &[&str],
        method_types: &[&str],
        extensions: &[&str],
    ) -> Self {
        Self {
            language: language.into(),
            class_types: class_types.iter().map(|s| s.to_string()).collect(),
            method_types: method_types.iter().map(|s| s.to_string()).collect(),
            name_field: default_name_field(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = field.into();
        self
    }

    pub fn is_class_like(&self, kind: &str) -> bool {
        self.class_types.contains(kind)
    }

    pub fn is_method_like(&self, kind: &str) -> bool {
        self.method_types.contains(kind)
    }

    pub fn validate(&self) -> Result<(), ChunkerError> {
        if self.language.trim().is_empty() {
            return Err(ChunkerError::Configuration(
                "classification table has an empty language id".into(),
            ));
        }
        if self.name_field.trim().is_empty() {
            return Err(ChunkerError::Configuration(format!(
                "classification table for {} has an empty name field",
                self.language
            )));
        }
        if let Some(kind) = self.class_types.intersection(&self.method_types).next() {
            return Err(ChunkerError::Configuration(format!(
                "node kind '{}' is both class-like and method-like in the {} table",
                kind, self.language
            )));
        }
        Ok(())
    }

    /// Built-in table for a bundled grammar.
    pub fn builtin(language: Language) -> Self {
        let id = language.id();
        let exts = language.extensions();
        match language {
            // Methods are declared beside their receiver type, not inside it
            Language::Go => Self::new(
                id,
                &["type_spec"],
                &["function_declaration", "method_declaration"],
                exts,
            ),
            Language::Java => Self::new(
                id,
                &[
                    "class_declaration",
                    "interface_declaration",
                    "enum_declaration",
                    "record_declaration",
                    "annotation_type_declaration",
                ],
                &["method_declaration", "constructor_declaration"],
                exts,
            ),
            Language::Python => {
                Self::new(id, &["class_definition"], &["function_definition"], exts)
            }
            // impl blocks carry no name field and are walked through
            Language::Rust => Self::new(
                id,
                &["struct_item", "enum_item", "union_item", "trait_item", "mod_item"],
                &["function_item", "function_signature_item"],
                exts,
            ),
            Language::TypeScript | Language::Tsx => Self::new(
                id,
                &[
                    "class_declaration",
                    "abstract_class_declaration",
                    "interface_declaration",
                    "enum_declaration",
                    "internal_module",
                ],
                &[
                    "function_declaration",
                    "generator_function_declaration",
                    "method_definition",
                    "method_signature",
                    "abstract_method_signature",
                ],
                exts,
            ),
            Language::JavaScript => Self::new(
                id,
                &["class_declaration"],
                &[
                    "function_declaration",
                    "generator_function_declaration",
                    "method_definition",
                ],
                exts,
            ),
        }
    }

    /// Built-in tables for every bundled grammar.
    pub fn builtins() -> Vec<Self> {
        Language::ALL.into_iter().map(Self::builtin).collect()
    }
}
