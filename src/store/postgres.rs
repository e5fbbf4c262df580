use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, Patch, StoreError};

/// Postgres-backed document store: one table per collection, the record body
/// in a JSONB column. Filters map to containment (`doc @> $1`), patches to a
/// JSONB merge (`doc || $2`), insertion order to a sequence column.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

// Collection names are interpolated into SQL, so only plain identifiers pass.
fn table_name(collection: &str) -> Result<&str, StoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_');
    if valid {
        Ok(collection)
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

fn row_to_document(row: PgRow) -> Result<Document, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let Json(body): Json<Map<String, Value>> = row.try_get("doc")?;
    Ok(Document { id, body })
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Idempotently creates one table per collection.
    pub async fn ensure_collections(&self, collections: &[&str]) -> Result<(), StoreError> {
        for collection in collections {
            let table = table_name(collection)?;
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {table} \
                 (id UUID PRIMARY KEY, seq BIGSERIAL, doc JSONB NOT NULL)"
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("SELECT id, doc FROM {table} WHERE doc @> $1 ORDER BY seq");
        let rows = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_document).collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("SELECT id, doc FROM {table} WHERE doc @> $1 ORDER BY seq LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_document).transpose()
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("SELECT id, doc FROM {table} WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(row_to_document).transpose()
    }

    async fn find_random(&self, collection: &str) -> Result<Option<Document>, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("SELECT id, doc FROM {table} ORDER BY random() LIMIT 1");
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;
        row.map(row_to_document).transpose()
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let table = table_name(collection)?;
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO {table} (id, doc) VALUES ($1, $2)");
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(body.clone())))
            .execute(&self.pool)
            .await?;
        Ok(Document { id, body })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!(
            "UPDATE {table} SET doc = doc || $2 WHERE id = \
             (SELECT id FROM {table} WHERE doc @> $1 ORDER BY seq LIMIT 1)"
        );
        let result = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .bind(Json(patch.as_json()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("UPDATE {table} SET doc = doc || $2 WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(patch.as_json()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("UPDATE {table} SET doc = doc || $2 WHERE doc @> $1");
        let result = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .bind(Json(patch.as_json()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        body: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("UPDATE {table} SET doc = $2 WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(Value::Object(body)))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!(
            "DELETE FROM {table} WHERE id = \
             (SELECT id FROM {table} WHERE doc @> $1 ORDER BY seq LIMIT 1)"
        );
        let result = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let table = table_name(collection)?;
        let sql = format!("DELETE FROM {table} WHERE doc @> $1");
        let result = sqlx::query(&sql)
            .bind(Json(filter.as_json()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
