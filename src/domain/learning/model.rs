//! Learning model definitions

use std::sync::RwLock;

use serde_json::Value;

use super::classifier::ClassifierSpec;
use super::ner::NerSpec;
use crate::domain::DomainError;

/// Output schema of a learning model
///
/// A definition carries at most one labelling capability; dispatch at the web
/// boundary matches on this tag.
#[derive(Debug, Clone)]
pub enum ModelTask {
    /// Registered for bookkeeping only, no labelling flow is available
    Plain,
    Classifier(ClassifierSpec),
    NamedEntityRecognizer(NerSpec),
}

impl ModelTask {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Classifier(_) => "classifier",
            Self::NamedEntityRecognizer(_) => "named_entity_recognizer",
        }
    }
}

/// A registered description of one labelling task
///
/// Constructed once at startup by discovery and held for the process lifetime.
/// Required fields are validated at the point of use, not at construction, so
/// a partially configured definition fails loudly the first time it is
/// exercised.
#[derive(Debug)]
pub struct LearningModel {
    name: String,
    document_source: Option<String>,
    verbose_name: Option<String>,
    description: Option<String>,
    task: ModelTask,

    // Populated by downstream training code, never by this service.
    trained_artifact: RwLock<Option<Value>>,
}

impl LearningModel {
    pub fn new(name: impl Into<String>, task: ModelTask) -> Self {
        Self {
            name: name.into(),
            document_source: None,
            verbose_name: None,
            description: None,
            task,
            trained_artifact: RwLock::new(None),
        }
    }

    pub fn with_document_source(mut self, source: impl Into<String>) -> Self {
        self.document_source = Some(source.into());
        self
    }

    pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The model name. Configuration error when blank.
    pub fn name(&self) -> Result<&str, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::configuration(
                "learning model is missing a name",
            ));
        }

        Ok(&self.name)
    }

    /// The document collection this model operates over.
    /// Configuration error when not set.
    pub fn document_source(&self) -> Result<&str, DomainError> {
        self.document_source.as_deref().ok_or_else(|| {
            DomainError::configuration(format!(
                "learning model '{}' is missing a document source",
                self.name
            ))
        })
    }

    pub fn verbose_name(&self) -> Option<&str> {
        self.verbose_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn task(&self) -> &ModelTask {
        &self.task
    }

    /// Stores a trained artifact produced by downstream training code
    pub fn set_trained_artifact(&self, artifact: Value) {
        if let Ok(mut slot) = self.trained_artifact.write() {
            *slot = Some(artifact);
        }
    }

    pub fn trained_artifact(&self) -> Option<Value> {
        self.trained_artifact
            .read()
            .ok()
            .and_then(|slot| slot.clone())
    }
}
