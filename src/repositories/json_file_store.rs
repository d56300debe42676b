//! Almacén sobre un fichero JSON
//!
//! Cada operación lee el fichero completo, lo modifica y lo vuelve a
//! escribir. Si el sistema de ficheros no permite escribir (entornos
//! serverless de solo lectura) el almacén pasa a trabajar en memoria
//! durante el resto de la vida del proceso.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::legacy;
use super::store::{Collection, DocumentStore, Snapshot};
use crate::utils::errors::AppResult;

#[derive(Debug, Default)]
struct FileState {
    fallback: Option<Snapshot>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

fn parse_snapshot(raw: &str) -> Result<Snapshot, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    legacy::migrate(serde_json::from_str(raw)?)
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(FileState::default()),
        }
    }

    /// `true` si el almacén ya no escribe en disco
    pub async fn is_in_memory(&self) -> bool {
        self.state.lock().await.fallback.is_some()
    }

    async fn load(&self, state: &mut FileState) -> Snapshot {
        if let Some(snapshot) = &state.fallback {
            return snapshot.clone();
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => match parse_snapshot(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("⚠️ No se pudo interpretar {}: {}. Usando almacén en memoria", self.path.display(), e);
                    state.fallback = Some(Snapshot::default());
                    Snapshot::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Snapshot::default();
                match self.write_file(&empty).await {
                    Ok(()) => info!("📄 Creado fichero de datos {}", self.path.display()),
                    Err(e) => {
                        warn!("⚠️ No se pudo crear {}: {}. Usando almacén en memoria", self.path.display(), e);
                        state.fallback = Some(empty.clone());
                    }
                }
                empty
            }
            Err(e) => {
                warn!("⚠️ No se pudo leer {}: {}. Usando almacén en memoria", self.path.display(), e);
                state.fallback = Some(Snapshot::default());
                Snapshot::default()
            }
        }
    }

    async fn write_file(&self, snapshot: &Snapshot) -> AppResult<()> {
        let body = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn persist(&self, state: &mut FileState, snapshot: Snapshot) -> AppResult<()> {
        if state.fallback.is_some() {
            state.fallback = Some(snapshot);
            return Ok(());
        }
        if let Err(e) = self.write_file(&snapshot).await {
            warn!("⚠️ No se pudo escribir {}: {}. Usando almacén en memoria", self.path.display(), e);
            state.fallback = Some(snapshot);
        }
        Ok(())
    }

    async fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        let mut state = self.state.lock().await;
        let snapshot = self.load(&mut state).await;
        f(&snapshot)
    }

    async fn mutate<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> AppResult<R> {
        let mut state = self.state.lock().await;
        let mut snapshot = self.load(&mut state).await;
        let result = f(&mut snapshot);
        self.persist(&mut state, snapshot).await?;
        Ok(result)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>> {
        Ok(self.read(|s| s.documents(collection).clone()).await)
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        Ok(self.read(|s| s.get(collection, id)).await)
    }

    async fn upsert(&self, collection: Collection, id: &str, document: Value) -> AppResult<()> {
        self.mutate(|s| s.upsert(collection, id, document)).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        self.mutate(|s| s.delete(collection, id)).await
    }

    async fn replace_collection(&self, collection: Collection, documents: Vec<Value>) -> AppResult<()> {
        self.mutate(|s| *s.documents_mut(collection) = documents).await
    }

    async fn snapshot(&self) -> AppResult<Snapshot> {
        Ok(self.read(Snapshot::clone).await)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_creates_file_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonFileStore::new(&path);

        store
            .upsert(Collection::Vehicles, "v1", json!({"id": "v1", "status": "base"}))
            .await
            .unwrap();
        assert!(!store.is_in_memory().await);

        let raw = std::fs::read_to_string(&path).unwrap();
        let on_disk: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk["vehicles"][0]["id"], "v1");
        assert!(on_disk["trips"].as_array().unwrap().is_empty());

        let reopened = JsonFileStore::new(&path);
        let doc = reopened.get(Collection::Vehicles, "v1").await.unwrap();
        assert_eq!(doc.unwrap()["status"], "base");
    }

    #[tokio::test]
    async fn test_falls_back_to_memory_when_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("db.json");
        let store = JsonFileStore::new(&path);

        store
            .upsert(Collection::Requests, "r1", json!({"id": "r1"}))
            .await
            .unwrap();

        assert!(store.is_in_memory().await);
        assert!(!path.exists());
        assert_eq!(store.list(Collection::Requests).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_loads_legacy_equipment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{"equipment":[{"id":"e1","name":"131","status":"in-use"}]}"#).unwrap();

        let store = JsonFileStore::new(&path);
        let vehicles = store.list(Collection::Vehicles).await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0]["model"], "131");
        assert_eq!(vehicles[0]["status"], "base");
    }
}
