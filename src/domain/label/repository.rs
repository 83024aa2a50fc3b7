//! Label store trait and in-memory implementation

use std::collections::HashSet;
use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use super::entity::LabelledDocument;
use crate::domain::DomainError;
use crate::domain::document::DocumentRef;

/// Persistence of (model, document) -> value records
#[async_trait]
pub trait LabelStore: Send + Sync + Debug {
    /// Point lookup by the composite unique key
    async fn get_for_document(
        &self,
        document: &DocumentRef,
        model_name: &str,
    ) -> Result<Option<LabelledDocument>, DomainError>;

    /// Atomic upsert keyed by (model, document).
    ///
    /// Returns the surviving record and whether it was created. An
    /// implementation must resolve concurrent submissions for the same pair
    /// to a single record (last writer wins on the value).
    async fn update_or_create_for_document(
        &self,
        document: &DocumentRef,
        model_name: &str,
        value: &Value,
    ) -> Result<(LabelledDocument, bool), DomainError>;

    /// Ids of documents in `source` already labelled under `model_name`.
    ///
    /// Strictly scoped to the given model name; labels stored under other
    /// model names never count.
    async fn labelled_document_ids(
        &self,
        model_name: &str,
        source: &str,
    ) -> Result<HashSet<String>, DomainError>;

    /// Most recently modified labels for a model, newest first
    async fn recently_modified(
        &self,
        model_name: &str,
        limit: usize,
    ) -> Result<Vec<LabelledDocument>, DomainError>;
}

/// In-memory implementation of [`LabelStore`]
pub mod in_memory {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use super::*;

    type RecordKey = (String, String, String);

    fn key(document: &DocumentRef, model_name: &str) -> RecordKey {
        (
            model_name.to_string(),
            document.source().to_string(),
            document.id().to_string(),
        )
    }

    /// Thread-safe in-memory label store for tests and development.
    ///
    /// Data is lost when the process terminates. The single write lock gives
    /// the same one-record-per-pair guarantee the relational unique
    /// constraint provides.
    #[derive(Debug, Default)]
    pub struct InMemoryLabelStore {
        records: RwLock<HashMap<RecordKey, LabelledDocument>>,
    }

    impl InMemoryLabelStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store pre-populated with records
        pub fn with_records(records: Vec<LabelledDocument>) -> Self {
            let store = Self::new();
            if let Ok(mut map) = store.records.write() {
                for record in records {
                    map.insert(key(record.document(), record.model_name()), record);
                }
            }
            store
        }

        pub fn count(&self) -> usize {
            self.records.read().map(|records| records.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl LabelStore for InMemoryLabelStore {
        async fn get_for_document(
            &self,
            document: &DocumentRef,
            model_name: &str,
        ) -> Result<Option<LabelledDocument>, DomainError> {
            let records = self.records.read().map_err(|e| {
                DomainError::storage(format!("failed to acquire read lock: {}", e))
            })?;

            Ok(records.get(&key(document, model_name)).cloned())
        }

        async fn update_or_create_for_document(
            &self,
            document: &DocumentRef,
            model_name: &str,
            value: &Value,
        ) -> Result<(LabelledDocument, bool), DomainError> {
            let serialized = LabelledDocument::serialize_value(value);
            let mut records = self.records.write().map_err(|e| {
                DomainError::storage(format!("failed to acquire write lock: {}", e))
            })?;

            match records.get_mut(&key(document, model_name)) {
                Some(record) => {
                    record.set_value(serialized);
                    Ok((record.clone(), false))
                }
                None => {
                    let record =
                        LabelledDocument::new(document.clone(), model_name, serialized);
                    records.insert(key(document, model_name), record.clone());
                    Ok((record, true))
                }
            }
        }

        async fn labelled_document_ids(
            &self,
            model_name: &str,
            source: &str,
        ) -> Result<HashSet<String>, DomainError> {
            let records = self.records.read().map_err(|e| {
                DomainError::storage(format!("failed to acquire read lock: {}", e))
            })?;

            Ok(records
                .keys()
                .filter(|(model, record_source, _)| model == model_name && record_source == source)
                .map(|(_, _, id)| id.clone())
                .collect())
        }

        async fn recently_modified(
            &self,
            model_name: &str,
            limit: usize,
        ) -> Result<Vec<LabelledDocument>, DomainError> {
            let records = self.records.read().map_err(|e| {
                DomainError::storage(format!("failed to acquire read lock: {}", e))
            })?;

            let mut recent: Vec<LabelledDocument> = records
                .values()
                .filter(|record| record.model_name() == model_name)
                .cloned()
                .collect();

            recent.sort_by(|a, b| b.modified().cmp(&a.modified()));
            recent.truncate(limit);
            Ok(recent)
        }
    }
}
