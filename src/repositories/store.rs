//! Interfaz de almacenamiento de documentos
//!
//! Todas las entidades se guardan como documentos JSON agrupados por
//! colección. Los backends (`MemoryStore`, `JsonFileStore`, `PgStore`)
//! implementan `DocumentStore`; la lógica de negocio solo ve los
//! repositorios tipados de `repository.rs`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::utils::errors::AppResult;

/// Colecciones del almacén
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Vehicles,
    Drivers,
    Users,
    Trips,
    Requests,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Vehicles,
        Collection::Drivers,
        Collection::Users,
        Collection::Trips,
        Collection::Requests,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles",
            Collection::Drivers => "drivers",
            Collection::Users => "users",
            Collection::Trips => "trips",
            Collection::Requests => "requests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Id de un documento. Los datos antiguos guardan ids numéricos.
pub fn document_id(document: &Value) -> Option<String> {
    match document.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Contenido completo del almacén, con el mismo formato que `db.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub vehicles: Vec<Value>,
    #[serde(default)]
    pub drivers: Vec<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
    #[serde(default)]
    pub trips: Vec<Value>,
    #[serde(default)]
    pub requests: Vec<Value>,
}

impl Snapshot {
    pub fn documents(&self, collection: Collection) -> &Vec<Value> {
        match collection {
            Collection::Vehicles => &self.vehicles,
            Collection::Drivers => &self.drivers,
            Collection::Users => &self.users,
            Collection::Trips => &self.trips,
            Collection::Requests => &self.requests,
        }
    }

    pub fn documents_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Vehicles => &mut self.vehicles,
            Collection::Drivers => &mut self.drivers,
            Collection::Users => &mut self.users,
            Collection::Trips => &mut self.trips,
            Collection::Requests => &mut self.requests,
        }
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        self.documents(collection)
            .iter()
            .find(|doc| document_id(doc).as_deref() == Some(id))
            .cloned()
    }

    /// Reemplaza en su sitio o anexa al final
    pub fn upsert(&mut self, collection: Collection, id: &str, document: Value) {
        let documents = self.documents_mut(collection);
        match documents
            .iter_mut()
            .find(|doc| document_id(doc).as_deref() == Some(id))
        {
            Some(slot) => *slot = document,
            None => documents.push(document),
        }
    }

    pub fn delete(&mut self, collection: Collection, id: &str) -> bool {
        let documents = self.documents_mut(collection);
        let before = documents.len();
        documents.retain(|doc| document_id(doc).as_deref() != Some(id));
        documents.len() != before
    }
}

/// Contrato de persistencia.
///
/// Cada llamada es atómica por sí misma; no hay transacciones entre
/// llamadas.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>>;

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>>;

    async fn upsert(&self, collection: Collection, id: &str, document: Value) -> AppResult<()>;

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool>;

    /// Reescribe una colección entera (pasadas de normalización)
    async fn replace_collection(&self, collection: Collection, documents: Vec<Value>) -> AppResult<()>;

    async fn snapshot(&self) -> AppResult<Snapshot>;

    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_accepts_numbers() {
        assert_eq!(document_id(&json!({"id": "v1"})).as_deref(), Some("v1"));
        assert_eq!(document_id(&json!({"id": 1700000000000u64})).as_deref(), Some("1700000000000"));
        assert_eq!(document_id(&json!({"name": "x"})), None);
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut snapshot = Snapshot::default();
        snapshot.upsert(Collection::Trips, "t1", json!({"id": "t1", "notes": "a"}));
        snapshot.upsert(Collection::Trips, "t2", json!({"id": "t2", "notes": "b"}));
        snapshot.upsert(Collection::Trips, "t1", json!({"id": "t1", "notes": "c"}));

        let trips = snapshot.documents(Collection::Trips);
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["notes"], "c");
        assert_eq!(trips[1]["id"], "t2");
    }

    #[test]
    fn test_delete_reports_missing() {
        let mut snapshot = Snapshot::default();
        snapshot.upsert(Collection::Vehicles, "v1", json!({"id": "v1"}));
        assert!(snapshot.delete(Collection::Vehicles, "v1"));
        assert!(!snapshot.delete(Collection::Vehicles, "v1"));
    }
}
