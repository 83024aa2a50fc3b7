//! Documents and document sources
//!
//! A document is any labellable entity the host application exposes through a
//! named [`DocumentSource`]. Learning models reference documents by
//! (source name, document id) pairs rather than by foreign keys, so any
//! collection the host can enumerate is labellable.

mod source;

pub use source::{DocumentSource, DocumentSources};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document taken from a host-provided source collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    body: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The document's `text` field, used by tokenizers. Empty when absent.
    pub fn text(&self) -> &str {
        self.body.get("text").and_then(Value::as_str).unwrap_or("")
    }
}

/// Reference to a document inside a named source collection
///
/// Together with a model name this forms the unique key of a stored label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    source: String,
    id: String,
}

impl DocumentRef {
    pub fn new(source: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_text() {
        let document = Document::new("1", json!({"text": "hello world"}));
        assert_eq!(document.text(), "hello world");
    }

    #[test]
    fn test_document_text_missing() {
        let document = Document::new("1", json!({"title": "no text field"}));
        assert_eq!(document.text(), "");
    }

    #[test]
    fn test_document_ref_equality() {
        let a = DocumentRef::new("reviews", "1");
        let b = DocumentRef::new("reviews", "1");
        let c = DocumentRef::new("reviews", "2");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
