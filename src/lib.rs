//! labelit
//!
//! Pluggable active-learning labelling service. Host components register
//! learning-model definitions (a name, a document collection and an output
//! schema - plain classification, multi-label classification or per-token
//! entity labelling), and the service exposes generic endpoints that let
//! annotators label documents and persist those labels for later training.
//!
//! Training itself is out of scope: definitions carry an artifact slot and
//! nothing more.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use api::AppState;
use config::StorageBackend;
use domain::DomainError;
use domain::document::{Document, DocumentSources};
use domain::label::{InMemoryLabelStore, LabelStore};
use domain::learning::{
    ClassDef, ClassifierSpec, LearningModel, LearningModelProvider, ModelLibrary, ModelTask,
    NerSpec, WordTokenizer, discover,
};
use infrastructure::document::InMemoryDocumentSource;
use infrastructure::label_store::{PostgresConfig, PostgresLabelStore};

/// Create the application state from the host's registered components.
///
/// Discovery runs once here; registry errors (invalid or duplicate names) are
/// fatal rather than silently shadowing a definition. The label store backend
/// is chosen from configuration.
pub async fn create_app_state(
    config: &AppConfig,
    providers: Vec<Arc<dyn LearningModelProvider>>,
    sources: DocumentSources,
) -> anyhow::Result<AppState> {
    let registry = Arc::new(discover(&providers)?);

    let labels: Arc<dyn LabelStore> = match config.storage.backend {
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("storage backend is 'postgres' but no database URL is set")
                })?;

            info!("Using PostgreSQL label store");
            let store = PostgresLabelStore::connect(
                &PostgresConfig::new(url)
                    .with_max_connections(config.storage.max_connections),
            )
            .await?;
            store.ensure_table().await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            info!("Using in-memory label store");
            Arc::new(InMemoryLabelStore::new())
        }
    };

    Ok(AppState::new(registry, Arc::new(sources), labels))
}

/// Demo models registered by `labelit serve` so the binary works out of the
/// box. A real deployment replaces these with its own providers and sources.
pub fn demo_providers() -> Vec<Arc<dyn LearningModelProvider>> {
    vec![Arc::new(DemoModels)]
}

struct DemoModels;

impl LearningModelProvider for DemoModels {
    fn learning_models(&self) -> Result<ModelLibrary, DomainError> {
        let mut library = ModelLibrary::new();

        library.register(
            LearningModel::new(
                "review_sentiment",
                ModelTask::Classifier(ClassifierSpec::new(vec![
                    ClassDef::new(0, "Negative"),
                    ClassDef::new(1, "Positive"),
                ])),
            )
            .with_document_source("reviews")
            .with_verbose_name("Review sentiment")
            .with_description("Overall sentiment of a product review"),
        )?;

        library.register(
            LearningModel::new(
                "review_topics",
                ModelTask::Classifier(
                    ClassifierSpec::new(vec![
                        ClassDef::new("price", "Price"),
                        ClassDef::new("quality", "Quality"),
                        ClassDef::new("shipping", "Shipping"),
                    ])
                    .with_multilabel(true),
                ),
            )
            .with_document_source("reviews")
            .with_verbose_name("Review topics"),
        )?;

        library.register(
            LearningModel::new(
                "review_entities",
                ModelTask::NamedEntityRecognizer(NerSpec::new(
                    vec![
                        ClassDef::new("PRODUCT", "Product"),
                        ClassDef::new("BRAND", "Brand"),
                    ],
                    Arc::new(WordTokenizer),
                )),
            )
            .with_document_source("reviews")
            .with_verbose_name("Review entities"),
        )?;

        Ok(library)
    }
}

/// Demo review corpus backing the demo models
pub fn demo_sources() -> DocumentSources {
    let reviews = InMemoryDocumentSource::new("reviews").with_documents(vec![
        Document::new(
            "1",
            json!({"text": "The Acme kettle boils fast and feels sturdy"}),
        ),
        Document::new(
            "2",
            json!({"text": "Overpriced for what it does, shipping took three weeks"}),
        ),
        Document::new(
            "3",
            json!({"text": "Replaced my old Contoso toaster, no complaints so far"}),
        ),
        Document::new(
            "4",
            json!({"text": "Stopped working after a month, support never answered"}),
        ),
    ]);

    DocumentSources::new().with_source(Arc::new(reviews))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_with_demo_fixtures() {
        let state = create_app_state(&AppConfig::default(), demo_providers(), demo_sources())
            .await
            .unwrap();

        assert_eq!(state.registry.len(), 3);
        assert!(state.registry.lookup("review_sentiment").is_some());
        assert!(state.sources.get("reviews").is_ok());
    }

    #[tokio::test]
    async fn test_create_app_state_fails_on_duplicate_providers() {
        // The same provider twice yields colliding model names
        let providers: Vec<Arc<dyn LearningModelProvider>> =
            vec![Arc::new(DemoModels), Arc::new(DemoModels)];

        let result = create_app_state(&AppConfig::default(), providers, demo_sources()).await;
        assert!(result.is_err());
    }
}
