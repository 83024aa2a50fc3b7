//! Unlabelled-document selection

use rand::Rng;

use super::repository::LabelStore;
use crate::domain::DomainError;
use crate::domain::document::{Document, DocumentSource};
use crate::domain::learning::LearningModel;

/// Documents in the model's source that carry no label under the model's name.
///
/// Labels stored under other model names do not exclude a document.
pub async fn unlabelled_documents(
    model: &LearningModel,
    source: &dyn DocumentSource,
    store: &dyn LabelStore,
) -> Result<Vec<Document>, DomainError> {
    let model_name = model.name()?;
    let labelled = store
        .labelled_document_ids(model_name, source.name())
        .await?;
    let documents = source.list().await?;

    Ok(documents
        .into_iter()
        .filter(|document| !labelled.contains(document.id()))
        .collect())
}

/// Uniform random pick from the unlabelled set.
///
/// `None` when every document is labelled — a normal terminal state, not an
/// error.
pub async fn random_unlabelled_document(
    model: &LearningModel,
    source: &dyn DocumentSource,
    store: &dyn LabelStore,
) -> Result<Option<Document>, DomainError> {
    let mut candidates = unlabelled_documents(model, source, store).await?;

    if candidates.is_empty() {
        return Ok(None);
    }

    let index = rand::thread_rng().gen_range(0..candidates.len());
    Ok(Some(candidates.swap_remove(index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DocumentRef;
    use crate::domain::label::InMemoryLabelStore;
    use crate::domain::learning::ModelTask;
    use crate::infrastructure::document::InMemoryDocumentSource;
    use serde_json::json;

    fn model() -> LearningModel {
        LearningModel::new("testmodel", ModelTask::Plain).with_document_source("reviews")
    }

    fn source() -> InMemoryDocumentSource {
        InMemoryDocumentSource::new("reviews")
            .with_document(Document::new("1", json!({})))
            .with_document(Document::new("2", json!({})))
            .with_document(Document::new("3", json!({})))
    }

    #[tokio::test]
    async fn test_unlabelled_documents_excludes_own_model_labels_only() {
        let store = InMemoryLabelStore::new();
        store
            .update_or_create_for_document(
                &DocumentRef::new("reviews", "1"),
                "testmodel",
                &json!({"label": "1"}),
            )
            .await
            .unwrap();
        store
            .update_or_create_for_document(
                &DocumentRef::new("reviews", "2"),
                "othermodel",
                &json!({"label": "1"}),
            )
            .await
            .unwrap();

        let unlabelled = unlabelled_documents(&model(), &source(), &store)
            .await
            .unwrap();
        let ids: Vec<&str> = unlabelled.iter().map(Document::id).collect();

        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_random_unlabelled_document() {
        let store = InMemoryLabelStore::new();
        store
            .update_or_create_for_document(
                &DocumentRef::new("reviews", "1"),
                "testmodel",
                &json!({"label": "1"}),
            )
            .await
            .unwrap();
        store
            .update_or_create_for_document(
                &DocumentRef::new("reviews", "2"),
                "othermodel",
                &json!({"label": "1"}),
            )
            .await
            .unwrap();

        let document = random_unlabelled_document(&model(), &source(), &store)
            .await
            .unwrap()
            .unwrap();

        assert!(["2", "3"].contains(&document.id()));
    }

    #[tokio::test]
    async fn test_random_unlabelled_document_is_none_when_nothing_left() {
        let store = InMemoryLabelStore::new();

        for id in ["1", "2", "3"] {
            store
                .update_or_create_for_document(
                    &DocumentRef::new("reviews", id),
                    "testmodel",
                    &json!({"label": "1"}),
                )
                .await
                .unwrap();
        }

        let document = random_unlabelled_document(&model(), &source(), &store)
            .await
            .unwrap();

        assert!(document.is_none());
    }
}
