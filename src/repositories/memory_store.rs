use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{Collection, DocumentStore, Snapshot};
use crate::utils::errors::AppResult;

/// Almacén en memoria, usado en tests y con `STORAGE_BACKEND=memory`
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::default())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>> {
        Ok(self.data.read().await.documents(collection).clone())
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        Ok(self.data.read().await.get(collection, id))
    }

    async fn upsert(&self, collection: Collection, id: &str, document: Value) -> AppResult<()> {
        self.data.write().await.upsert(collection, id, document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        Ok(self.data.write().await.delete(collection, id))
    }

    async fn replace_collection(&self, collection: Collection, documents: Vec<Value>) -> AppResult<()> {
        *self.data.write().await.documents_mut(collection) = documents;
        Ok(())
    }

    async fn snapshot(&self) -> AppResult<Snapshot> {
        Ok(self.data.read().await.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
