//! Almacén sobre PostgreSQL
//!
//! Guarda cada documento como JSONB en una única tabla
//! `fleet_documents`. La columna `position` conserva el orden de inserción
//! para que los listados salgan igual que con el fichero JSON.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use super::store::{Collection, DocumentStore, Snapshot};
use crate::utils::errors::AppResult;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS fleet_documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body JSONB NOT NULL,
    position BIGSERIAL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (collection, id)
)
"#;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea la tabla si no existe
    pub async fn init_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("🗄️ Tabla fleet_documents lista");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM fleet_documents WHERE collection = $1 ORDER BY position",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM fleet_documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.0))
    }

    async fn upsert(&self, collection: Collection, id: &str, document: Value) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fleet_documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(document))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM fleet_documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_collection(&self, collection: Collection, documents: Vec<Value>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM fleet_documents WHERE collection = $1")
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        for document in documents {
            let Some(id) = super::store::document_id(&document) else {
                continue;
            };
            sqlx::query(
                r#"
                INSERT INTO fleet_documents (collection, id, body)
                VALUES ($1, $2, $3)
                ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body
                "#,
            )
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(document))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn snapshot(&self) -> AppResult<Snapshot> {
        let mut snapshot = Snapshot::default();
        for collection in Collection::ALL {
            *snapshot.documents_mut(collection) = self.list(collection).await?;
        }
        Ok(snapshot)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
