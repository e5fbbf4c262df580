use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::Rng;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, Patch, StoreError};

/// In-process store keeping each collection as a vector in insertion order.
/// Serves local runs without a database and backs the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(&doc.body)).cloned()))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn find_random(&self, collection: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().unwrap();
        Ok(collections.get(collection).and_then(|docs| {
            if docs.is_empty() {
                None
            } else {
                let index = rand::thread_rng().gen_range(0..docs.len());
                docs.get(index).cloned()
            }
        }))
    }

    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let doc = Document {
            id: Uuid::new_v4(),
            body,
        };
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            if let Some(doc) = docs.iter_mut().find(|doc| filter.matches(&doc.body)) {
                patch.apply_to(&mut doc.body);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            if let Some(doc) = docs.iter_mut().find(|doc| doc.id == id) {
                patch.apply_to(&mut doc.body);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        let mut modified = 0;
        if let Some(docs) = collections.get_mut(collection) {
            for doc in docs.iter_mut().filter(|doc| filter.matches(&doc.body)) {
                patch.apply_to(&mut doc.body);
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        body: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            if let Some(doc) = docs.iter_mut().find(|doc| doc.id == id) {
                doc.body = body;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            if let Some(index) = docs.iter().position(|doc| filter.matches(&doc.body)) {
                docs.remove(index);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            if let Some(index) = docs.iter().position(|doc| doc.id == id) {
                docs.remove(index);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().unwrap();
        let mut deleted = 0;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| {
                if filter.matches(&doc.body) {
                    deleted += 1;
                    false
                } else {
                    true
                }
            });
        }
        Ok(deleted)
    }
}
