pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
}

/// One persisted record: a store-assigned id plus the document fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub body: Map<String, Value>,
}

/// Field/value equality constraints over top-level document fields.
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        self.0.iter().all(|(k, v)| body.get(k) == Some(v))
    }

    pub fn as_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// A field-set patch: fields to overwrite, everything else left untouched.
#[derive(Debug, Clone, Default)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply_to(&self, body: &mut Map<String, Value>) {
        for (k, v) in &self.0 {
            body.insert(k.clone(), v.clone());
        }
    }

    pub fn as_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Generic document-store operations. The server builds one store at startup
/// and hands it to the handlers; backends must not hold locks across awaits.
///
/// "One" variants act on the first match in insertion order and report the
/// number of affected documents; zero matches is a successful no-op, not an
/// error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_by_id(&self, collection: &str, id: Uuid)
        -> Result<Option<Document>, StoreError>;

    /// Uniform-random pick over the current documents, `None` when empty.
    async fn find_random(&self, collection: &str) -> Result<Option<Document>, StoreError>;

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError>;

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: &Patch,
    ) -> Result<u64, StoreError>;

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError>;

    /// Full-document replace; last write wins. Returns whether the id existed.
    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        body: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<u64, StoreError>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&body(json!({"firstName": "John"}))));
        assert!(filter.matches(&Map::new()));
    }

    #[test]
    fn filter_requires_every_constraint() {
        let filter = Filter::new().eq("firstName", "John").eq("department", "HR");
        assert!(filter.matches(&body(json!({
            "firstName": "John", "lastName": "Doe", "department": "HR"
        }))));
        assert!(!filter.matches(&body(json!({
            "firstName": "John", "lastName": "Doe", "department": "IT"
        }))));
        assert!(!filter.matches(&body(json!({"firstName": "John"}))));
    }

    #[test]
    fn patch_overwrites_only_named_fields() {
        let mut doc = body(json!({"firstName": "John", "lastName": "Doe"}));
        Patch::new().set("firstName", "Katy").apply_to(&mut doc);
        assert_eq!(doc, body(json!({"firstName": "Katy", "lastName": "Doe"})));
    }
}
