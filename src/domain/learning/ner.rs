//! Named-entity-recognizer capability
//!
//! NER models share the classifier's class set but label one token at a time.
//! The exposed class list always starts with an implicit "outside" class that
//! is never part of the user-declared classes.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::{Value, json};
use unicode_segmentation::UnicodeSegmentation;

use super::classifier::{ClassDef, assign_colors};
use crate::domain::DomainError;
use crate::domain::document::Document;

pub const DEFAULT_OUTSIDE_CLASS: &str = "O";
pub const DEFAULT_OUTSIDE_DISPLAY: &str = "OUTSIDE";

/// Produces the ordered token sequence for a document.
///
/// The token count must match between labelling and training, so a model must
/// keep using the same tokenizer for both.
pub trait Tokenizer: Send + Sync + Debug {
    fn tokenize(&self, document: &Document) -> Vec<String>;
}

/// Splits the document text on unicode word boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, document: &Document) -> Vec<String> {
        document
            .text()
            .unicode_words()
            .map(str::to_string)
            .collect()
    }
}

/// Output schema for per-token sequence labelling
#[derive(Debug, Clone)]
pub struct NerSpec {
    classes: Vec<ClassDef>,
    outside: ClassDef,
    tokenizer: Arc<dyn Tokenizer>,
}

impl NerSpec {
    pub fn new(classes: Vec<ClassDef>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            classes,
            outside: ClassDef::new(DEFAULT_OUTSIDE_CLASS, DEFAULT_OUTSIDE_DISPLAY),
            tokenizer,
        }
    }

    /// Overrides the implicit outside class key and display label
    pub fn with_outside_class(mut self, key: impl ToString, label: impl Into<String>) -> Self {
        self.outside = ClassDef::new(key, label);
        self
    }

    pub fn outside_class(&self) -> &ClassDef {
        &self.outside
    }

    /// Declared classes with the outside class prepended.
    /// Configuration error when no classes are declared.
    pub fn classes(&self) -> Result<Vec<ClassDef>, DomainError> {
        if self.classes.is_empty() {
            return Err(DomainError::configuration("NER model is missing classes"));
        }

        let mut classes = Vec::with_capacity(self.classes.len() + 1);
        classes.push(self.outside.clone());
        classes.extend(self.classes.iter().cloned());
        Ok(classes)
    }

    /// Exposed class list with a color assigned to every entry
    pub fn classes_with_colors(&self) -> Result<Vec<ClassDef>, DomainError> {
        Ok(assign_colors(&self.classes()?))
    }

    /// Maps a class key to its display label, falling back to the key itself
    pub fn display_label(&self, key: &str) -> String {
        if key == self.outside.key() {
            return self.outside.label().to_string();
        }

        self.classes
            .iter()
            .find(|class| class.key() == key)
            .map(|class| class.label().to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn tokens(&self, document: &Document) -> Vec<String> {
        self.tokenizer.tokenize(document)
    }

    /// Default label list: every token tagged with the outside class
    pub fn default_labels(&self, token_count: usize) -> Value {
        Value::Array(
            (0..token_count)
                .map(|_| json!({"label": self.outside.key()}))
                .collect(),
        )
    }
}
