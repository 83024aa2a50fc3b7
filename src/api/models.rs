//! Learning model listing and overview endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::learning::{ClassDef, ModelTask};

#[derive(Serialize)]
pub struct ModelSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub task: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_source: Option<String>,
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelSummary>,
}

/// GET /models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let mut models: Vec<ModelSummary> = state
        .registry
        .iter()
        .map(|(name, model)| ModelSummary {
            name: name.to_string(),
            verbose_name: model.verbose_name().map(str::to_string),
            description: model.description().map(str::to_string),
            task: model.task().kind(),
            document_source: model.document_source().ok().map(str::to_string),
        })
        .collect();

    models.sort_by(|a, b| a.name.cmp(&b.name));
    Json(ModelsResponse { models })
}

#[derive(Serialize)]
pub struct RecentLabel {
    pub document_id: String,
    pub value: Value,
    pub modified: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ModelDetail {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub task: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<ClassDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multilabel: Option<bool>,
    pub recent_labels: Vec<RecentLabel>,
}

/// GET /models/{name}
///
/// Renders the definition plus its ten most recently modified labels.
pub async fn model_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ModelDetail>, ApiError> {
    let model = state.registry.lookup(&name).ok_or_else(|| {
        ApiError::not_found(format!("learning model '{}' is not registered", name))
    })?;

    let (classes, multilabel) = match model.task() {
        ModelTask::Plain => (None, None),
        ModelTask::Classifier(spec) => {
            (Some(spec.classes_with_colors()?), Some(spec.is_multilabel()))
        }
        ModelTask::NamedEntityRecognizer(spec) => (Some(spec.classes_with_colors()?), None),
    };

    // Display mapping needs the document; fall back to the raw stored value
    // when the source or document is gone.
    let source = model
        .document_source()
        .ok()
        .and_then(|source| state.sources.get(source).ok());

    let mut recent_labels = Vec::new();
    for record in state.labels.recently_modified(&name, 10).await? {
        let value = match &source {
            Some(source) => match source.get(record.document().id()).await? {
                Some(document) => record.display_value(&model, &document),
                None => record.deserialize_value(),
            },
            None => record.deserialize_value(),
        };

        recent_labels.push(RecentLabel {
            document_id: record.document().id().to_string(),
            value,
            modified: record.modified(),
        });
    }

    Ok(Json(ModelDetail {
        name,
        verbose_name: model.verbose_name().map(str::to_string),
        description: model.description().map(str::to_string),
        task: model.task().kind(),
        document_source: model.document_source().ok().map(str::to_string),
        classes,
        multilabel,
        recent_labels,
    }))
}
