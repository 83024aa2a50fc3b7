//! In-memory document source

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::document::{Document, DocumentSource};

/// Fixed document collection held in memory, for tests and the demo corpus.
///
/// Documents keep their insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentSource {
    name: String,
    documents: Vec<Document>,
}

impl InMemoryDocumentSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents.extend(documents);
        self
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, DomainError> {
        Ok(self
            .documents
            .iter()
            .find(|document| document.id() == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Document>, DomainError> {
        Ok(self.documents.clone())
    }
}
