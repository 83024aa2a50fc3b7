//! PostgreSQL label store with connection pooling

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::domain::DomainError;
use crate::domain::document::DocumentRef;
use crate::domain::label::{LabelStore, LabelledDocument};

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/labelit".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// PostgreSQL implementation of [`LabelStore`].
///
/// The composite unique constraint over (model_name, document_type,
/// document_id) is what arbitrates concurrent submissions: the upsert is a
/// single `INSERT .. ON CONFLICT DO UPDATE`, so two simultaneous writers for
/// the same pair converge to one row with the last writer's value.
#[derive(Debug)]
pub struct PostgresLabelStore {
    pool: PgPool,
}

impl PostgresLabelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool using the given configuration
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                DomainError::storage(format!("failed to connect to PostgreSQL: {}", e))
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ensures the labelled_documents table and its unique constraint exist
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS labelled_documents (
                id UUID PRIMARY KEY,
                model_name TEXT NOT NULL,
                document_type TEXT NOT NULL,
                document_id TEXT NOT NULL,
                value TEXT NOT NULL,
                created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                modified TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (model_name, document_type, document_id)
            )
            "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("failed to create table: {}", e)))?;

        Ok(())
    }
}

fn row_to_record(row: &PgRow) -> Result<LabelledDocument, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("failed to read row: {}", e));

    Ok(LabelledDocument::from_parts(
        row.try_get("id").map_err(read)?,
        DocumentRef::new(
            row.try_get::<String, _>("document_type").map_err(read)?,
            row.try_get::<String, _>("document_id").map_err(read)?,
        ),
        row.try_get("model_name").map_err(read)?,
        row.try_get("value").map_err(read)?,
        row.try_get("created").map_err(read)?,
        row.try_get("modified").map_err(read)?,
    ))
}

#[async_trait]
impl LabelStore for PostgresLabelStore {
    async fn get_for_document(
        &self,
        document: &DocumentRef,
        model_name: &str,
    ) -> Result<Option<LabelledDocument>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, model_name, document_type, document_id, value, created, modified
            FROM labelled_documents
            WHERE model_name = $1 AND document_type = $2 AND document_id = $3
            "#,
        )
        .bind(model_name)
        .bind(document.source())
        .bind(document.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to get label: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn update_or_create_for_document(
        &self,
        document: &DocumentRef,
        model_name: &str,
        value: &Value,
    ) -> Result<(LabelledDocument, bool), DomainError> {
        let serialized = LabelledDocument::serialize_value(value);

        let row = sqlx::query(
            r#"
            INSERT INTO labelled_documents (id, model_name, document_type, document_id, value)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (model_name, document_type, document_id)
            DO UPDATE SET value = EXCLUDED.value, modified = NOW()
            RETURNING id, model_name, document_type, document_id, value, created, modified,
                      (xmax = 0) AS was_created
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(model_name)
        .bind(document.source())
        .bind(document.id())
        .bind(&serialized)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to upsert label: {}", e)))?;

        let record = row_to_record(&row)?;
        let was_created: bool = row
            .try_get("was_created")
            .map_err(|e| DomainError::storage(format!("failed to read row: {}", e)))?;

        Ok((record, was_created))
    }

    async fn labelled_document_ids(
        &self,
        model_name: &str,
        source: &str,
    ) -> Result<HashSet<String>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT document_id
            FROM labelled_documents
            WHERE model_name = $1 AND document_type = $2
            "#,
        )
        .bind(model_name)
        .bind(source)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to list labelled ids: {}", e)))?;

        rows.iter()
            .map(|row| {
                row.try_get("document_id")
                    .map_err(|e| DomainError::storage(format!("failed to read row: {}", e)))
            })
            .collect()
    }

    async fn recently_modified(
        &self,
        model_name: &str,
        limit: usize,
    ) -> Result<Vec<LabelledDocument>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, model_name, document_type, document_id, value, created, modified
            FROM labelled_documents
            WHERE model_name = $1
            ORDER BY modified DESC
            LIMIT $2
            "#,
        )
        .bind(model_name)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to list recent labels: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }
}
