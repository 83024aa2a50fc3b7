//! Labelled document records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::document::{Document, DocumentRef};
use crate::domain::learning::{LearningModel, ModelTask};

/// One stored label: an arbitrary JSON value keyed by model name and document
///
/// At most one record exists per (model, document) pair; the value is updated
/// in place on every later submission. `model_name` is a foreign key in
/// spirit only — the definition may not be registered at storage time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledDocument {
    id: Uuid,
    model_name: String,
    document: DocumentRef,
    value: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl LabelledDocument {
    pub fn new(
        document: DocumentRef,
        model_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            model_name: model_name.into(),
            document,
            value: value.into(),
            created: now,
            modified: now,
        }
    }

    /// Rebuilds a record from stored columns
    pub(crate) fn from_parts(
        id: Uuid,
        document: DocumentRef,
        model_name: String,
        value: String,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            model_name,
            document,
            value,
            created,
            modified,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    /// The raw stored value text
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
        self.modified = Utc::now();
    }

    /// Encodes a label value as JSON text
    pub fn serialize_value(value: &Value) -> String {
        value.to_string()
    }

    /// Decodes the stored value.
    ///
    /// Malformed text reads as an empty object so corrupt historical rows do
    /// not break rendering.
    pub fn deserialize_value(&self) -> Value {
        serde_json::from_str(&self.value).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// The `label` key of the stored value (classifier flows)
    pub fn label(&self) -> Option<Value> {
        self.deserialize_value().get("label").cloned()
    }

    /// Maps the stored value into display form for the given model.
    ///
    /// Classifier keys become display labels (a list when multilabel); NER
    /// labels are zipped with the document's tokens.
    pub fn display_value(&self, model: &LearningModel, document: &Document) -> Value {
        let value = self.deserialize_value();

        match model.task() {
            ModelTask::Plain => value,
            ModelTask::Classifier(spec) => match value.get("label").cloned() {
                Some(Value::Array(keys)) => Value::Array(
                    keys.iter()
                        .map(|key| display_key(key, |k| spec.display_label(k)))
                        .collect(),
                ),
                Some(key) => display_key(&key, |k| spec.display_label(k)),
                None => value,
            },
            ModelTask::NamedEntityRecognizer(spec) => {
                let tokens = spec.tokens(document);
                let labels = value.as_array().cloned().unwrap_or_default();

                Value::Array(
                    tokens
                        .iter()
                        .zip(labels.iter())
                        .map(|(token, entry)| {
                            let label = entry
                                .get("label")
                                .and_then(Value::as_str)
                                .map(|key| spec.display_label(key))
                                .unwrap_or_default();
                            serde_json::json!({"token": token, "label": label})
                        })
                        .collect(),
                )
            }
        }
    }
}

fn display_key(key: &Value, display: impl Fn(&str) -> String) -> Value {
    match key.as_str() {
        Some(key) => Value::String(display(key)),
        None => key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learning::{ClassDef, ClassifierSpec, NerSpec, WordTokenizer};
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: &str) -> LabelledDocument {
        LabelledDocument::new(DocumentRef::new("reviews", "1"), "test", value)
    }

    #[test]
    fn test_serialize_deserialize_round_trip() {
        let value = json!({"foo": "bar", "hello": ["world", "!"]});
        let stored = record(&LabelledDocument::serialize_value(&value));

        assert_eq!(stored.deserialize_value(), value);
    }

    #[test]
    fn test_deserialize_nested_value() {
        let value = json!([["foo", "bar", "baz"], {"hello": "world"}]);
        let stored = record(&LabelledDocument::serialize_value(&value));

        assert_eq!(stored.deserialize_value(), value);
    }

    #[test]
    fn test_deserialize_invalid_json_returns_empty_object() {
        let stored = record("{{{foobar]");
        assert_eq!(stored.deserialize_value(), json!({}));
    }

    #[test]
    fn test_label() {
        let value = json!({"label": "foo", "value": "bar"});
        let stored = record(&LabelledDocument::serialize_value(&value));

        assert_eq!(stored.label(), Some(json!("foo")));
    }

    #[test]
    fn test_label_missing() {
        let stored = record("{}");
        assert!(stored.label().is_none());
    }

    #[test]
    fn test_display_value_single_label() {
        let model = LearningModel::new(
            "test",
            ModelTask::Classifier(ClassifierSpec::new(vec![
                ClassDef::new(0, "No"),
                ClassDef::new(1, "Yes"),
            ])),
        );
        let document = Document::new("1", json!({}));
        let stored = record(&LabelledDocument::serialize_value(&json!({"label": "1"})));

        assert_eq!(stored.display_value(&model, &document), json!("Yes"));
    }

    #[test]
    fn test_display_value_multilabel() {
        let model = LearningModel::new(
            "test",
            ModelTask::Classifier(
                ClassifierSpec::new(vec![ClassDef::new(0, "No"), ClassDef::new(1, "Yes")])
                    .with_multilabel(true),
            ),
        );
        let document = Document::new("1", json!({}));
        let stored = record(&LabelledDocument::serialize_value(
            &json!({"label": ["1", "0"]}),
        ));

        assert_eq!(stored.display_value(&model, &document), json!(["Yes", "No"]));
    }

    #[test]
    fn test_display_value_ner_zips_tokens() {
        let model = LearningModel::new(
            "test",
            ModelTask::NamedEntityRecognizer(NerSpec::new(
                vec![ClassDef::new("DAY", "Day")],
                Arc::new(WordTokenizer),
            )),
        );
        let document = Document::new("1", json!({"text": "hello world"}));
        let stored = record(&LabelledDocument::serialize_value(
            &json!([{"label": "DAY"}, {"label": "O"}]),
        ));

        assert_eq!(
            stored.display_value(&model, &document),
            json!([
                {"token": "hello", "label": "Day"},
                {"token": "world", "label": "OUTSIDE"}
            ])
        );
    }
}
