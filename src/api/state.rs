//! Application state shared across request handlers

use std::sync::Arc;

use crate::domain::document::DocumentSources;
use crate::domain::label::LabelStore;
use crate::domain::learning::ModelRegistry;

/// Shared application state.
///
/// The registry and source table are built once at startup and read-only
/// afterwards; the label store is the only shared mutable resource and all
/// mutation goes through its upsert.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub sources: Arc<DocumentSources>,
    pub labels: Arc<dyn LabelStore>,
}

impl AppState {
    pub fn new(
        registry: Arc<ModelRegistry>,
        sources: Arc<DocumentSources>,
        labels: Arc<dyn LabelStore>,
    ) -> Self {
        Self {
            registry,
            sources,
            labels,
        }
    }
}
