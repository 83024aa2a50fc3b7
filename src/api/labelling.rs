//! Labelling workflow dispatch and flows
//!
//! Each request resolves the model name through the registry and the document
//! through the model's source, then branches on the declared capability:
//! classifier submissions store `{"label": key | [keys]}`, NER submissions
//! store one `{"label": key}` entry per token. No state is retained between
//! requests.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::DomainError;
use crate::domain::document::{Document, DocumentRef};
use crate::domain::label::{LabelledDocument, random_unlabelled_document};
use crate::domain::learning::{ClassDef, ClassifierSpec, LearningModel, ModelTask, NerSpec};

/// The labelling form exposed to annotators
#[derive(Serialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum LabellingPage {
    Classifier {
        model: String,
        document_id: String,
        classes: Vec<ClassDef>,
        multilabel: bool,
        value: Value,
    },
    NamedEntityRecognizer {
        model: String,
        document_id: String,
        classes: Vec<ClassDef>,
        tokens: Vec<String>,
        value: Value,
    },
}

/// GET /models/{name}/random
///
/// Redirects to the labelling URL of a random unlabelled document, or back to
/// the model overview when nothing is left to label.
pub async fn random_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect, ApiError> {
    let model = state.registry.lookup(&name).ok_or_else(|| {
        ApiError::not_found(format!("learning model '{}' is not registered", name))
    })?;

    let source = state.sources.get(model.document_source()?)?;

    match random_unlabelled_document(&model, source.as_ref(), state.labels.as_ref()).await? {
        Some(document) => Ok(Redirect::to(&format!(
            "/models/{}/{}",
            name,
            document.id()
        ))),
        None => Ok(Redirect::to(&format!("/models/{}", name))),
    }
}

/// GET /models/{name}/{document_id}
pub async fn labelling_page(
    State(state): State<AppState>,
    Path((name, document_id)): Path<(String, String)>,
) -> Result<Json<LabellingPage>, ApiError> {
    let (model, document, reference) = resolve(&state, &name, &document_id).await?;
    let stored = state.labels.get_for_document(&reference, &name).await?;

    let page = match model.task() {
        ModelTask::Plain => return Err(no_labelling_flow(&name).into()),
        ModelTask::Classifier(spec) => LabellingPage::Classifier {
            model: name,
            document_id,
            classes: spec.classes()?.to_vec(),
            multilabel: spec.is_multilabel(),
            value: stored
                .map(|record| record.deserialize_value())
                .unwrap_or_else(|| json!({})),
        },
        ModelTask::NamedEntityRecognizer(spec) => {
            let tokens = spec.tokens(&document);
            let value = initial_ner_value(spec, &tokens, stored.as_ref());

            LabellingPage::NamedEntityRecognizer {
                model: name,
                document_id,
                classes: spec.classes_with_colors()?,
                tokens,
                value,
            }
        }
    };

    Ok(Json(page))
}

/// POST /models/{name}/{document_id}
///
/// Validates the submitted value, upserts the label and redirects to the
/// next random unlabelled document.
pub async fn submit_label(
    State(state): State<AppState>,
    Path((name, document_id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Redirect, ApiError> {
    let (model, document, reference) = resolve(&state, &name, &document_id).await?;

    let value = match model.task() {
        ModelTask::Plain => return Err(no_labelling_flow(&name).into()),
        ModelTask::Classifier(spec) => validate_classifier_submission(spec, &payload)?,
        ModelTask::NamedEntityRecognizer(spec) => {
            validate_ner_submission(spec, &document, &payload)?
        }
    };

    let (_, created) = state
        .labels
        .update_or_create_for_document(&reference, &name, &value)
        .await?;
    debug!(model = %name, document = %document_id, created, "label stored");

    Ok(Redirect::to(&format!("/models/{}/random", name)))
}

/// Resolves model and document or fails with the matching 404
async fn resolve(
    state: &AppState,
    name: &str,
    document_id: &str,
) -> Result<(Arc<LearningModel>, Document, DocumentRef), ApiError> {
    let model = state.registry.lookup(name).ok_or_else(|| {
        ApiError::not_found(format!("learning model '{}' is not registered", name))
    })?;

    let source_name = model.document_source().map_err(ApiError::from)?.to_string();
    let source = state.sources.get(&source_name)?;

    let document = source.get(document_id).await?.ok_or_else(|| {
        ApiError::not_found(format!(
            "document '{}' does not exist in '{}'",
            document_id, source_name
        ))
    })?;

    let reference = DocumentRef::new(source_name, document_id);
    Ok((model, document, reference))
}

fn no_labelling_flow(name: &str) -> DomainError {
    DomainError::configuration(format!("learning model '{}' has no labelling flow", name))
}

/// Stored labels only count while their length still matches the token
/// sequence; on drift the value resets to outside-class defaults.
fn initial_ner_value(spec: &NerSpec, tokens: &[String], stored: Option<&LabelledDocument>) -> Value {
    match stored.map(|record| record.deserialize_value()) {
        Some(Value::Array(labels)) if labels.len() == tokens.len() => Value::Array(labels),
        _ => spec.default_labels(tokens.len()),
    }
}

fn validate_classifier_submission(
    spec: &ClassifierSpec,
    payload: &Value,
) -> Result<Value, DomainError> {
    let keys: HashSet<&str> = spec.classes()?.iter().map(ClassDef::key).collect();

    let label = payload
        .get("label")
        .ok_or_else(|| DomainError::validation("submission is missing a `label`"))?;

    if spec.is_multilabel() {
        let entries = label
            .as_array()
            .ok_or_else(|| DomainError::validation("label must be a list of class keys"))?;

        if entries.is_empty() {
            return Err(DomainError::validation("at least one label is required"));
        }

        for entry in entries {
            check_class_key(&keys, entry)?;
        }
    } else {
        check_class_key(&keys, label)?;
    }

    Ok(json!({ "label": label }))
}

fn validate_ner_submission(
    spec: &NerSpec,
    document: &Document,
    payload: &Value,
) -> Result<Value, DomainError> {
    let tokens = spec.tokens(document);

    let entries = payload
        .as_array()
        .ok_or_else(|| DomainError::validation("submission must be a list of per-token labels"))?;

    if entries.len() != tokens.len() {
        return Err(DomainError::validation(format!(
            "expected {} labels, got {}",
            tokens.len(),
            entries.len()
        )));
    }

    let classes = spec.classes()?;
    let keys: HashSet<&str> = classes.iter().map(ClassDef::key).collect();

    for entry in entries {
        let label = entry
            .get("label")
            .ok_or_else(|| DomainError::validation("each entry must carry a `label`"))?;
        check_class_key(&keys, label)?;
    }

    Ok(payload.clone())
}

fn check_class_key(keys: &HashSet<&str>, value: &Value) -> Result<(), DomainError> {
    let key = value
        .as_str()
        .ok_or_else(|| DomainError::validation("label must be a class key string"))?;

    if !keys.contains(key) {
        return Err(DomainError::validation(format!(
            "'{}' is not a known class key",
            key
        )));
    }

    Ok(())
}
