use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::Document;
use crate::domain::DomainError;

/// A named, queryable collection of documents provided by the host application
///
/// Learning model definitions name the source they operate over; the service
/// resolves that name through [`DocumentSources`] at request time.
#[async_trait]
pub trait DocumentSource: Send + Sync + Debug {
    /// Collection name referenced by learning model definitions
    fn name(&self) -> &str;

    /// Get a document by id
    async fn get(&self, id: &str) -> Result<Option<Document>, DomainError>;

    /// All documents in the collection
    async fn list(&self) -> Result<Vec<Document>, DomainError>;
}

/// Name-to-source table injected by the host application at startup
#[derive(Debug, Clone, Default)]
pub struct DocumentSources {
    sources: HashMap<String, Arc<dyn DocumentSource>>,
}

impl DocumentSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a source under its own name
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.insert(source);
        self
    }

    pub fn insert(&mut self, source: Arc<dyn DocumentSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    /// Resolves a source name declared by a learning model.
    ///
    /// A model pointing at an unregistered source is a deployment mistake, so
    /// this is a configuration error rather than a not-found condition.
    pub fn get(&self, name: &str) -> Result<Arc<dyn DocumentSource>, DomainError> {
        self.sources.get(name).cloned().ok_or_else(|| {
            DomainError::configuration(format!("document source '{}' is not registered", name))
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::document::InMemoryDocumentSource;
    use serde_json::json;

    #[test]
    fn test_get_unregistered_source_is_configuration_error() {
        let sources = DocumentSources::new();
        let result = sources.get("reviews");

        assert!(matches!(
            result,
            Err(DomainError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_registered_source() {
        let source = InMemoryDocumentSource::new("reviews")
            .with_document(Document::new("1", json!({"text": "great"})));
        let sources = DocumentSources::new().with_source(Arc::new(source));

        let resolved = sources.get("reviews").unwrap();
        assert_eq!(resolved.name(), "reviews");
        assert!(resolved.get("1").await.unwrap().is_some());
    }
}
