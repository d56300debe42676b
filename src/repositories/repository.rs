//! Repositorios tipados sobre `DocumentStore`

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use super::store::{Collection, DocumentStore};
use crate::models::{Driver, Request, Trip, User, Vehicle};
use crate::utils::errors::AppResult;

/// Entidad persistible en una colección
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

impl Record for Vehicle {
    const COLLECTION: Collection = Collection::Vehicles;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Driver {
    const COLLECTION: Collection = Collection::Drivers;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Trip {
    const COLLECTION: Collection = Collection::Trips;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Request {
    const COLLECTION: Collection = Collection::Requests;

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Lista todos los registros; los documentos ilegibles se omiten
    pub async fn list(&self) -> AppResult<Vec<T>> {
        let documents = self.store.list(T::COLLECTION).await?;
        Ok(documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<T>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("⚠️ Documento ilegible en {}: {}", T::COLLECTION, e);
                    None
                }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.store.get(T::COLLECTION, id).await?.is_some())
    }

    pub async fn upsert(&self, record: &T) -> AppResult<()> {
        let document = serde_json::to_value(record)?;
        self.store.upsert(T::COLLECTION, record.id(), document).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }

    /// Reescribe la colección completa con los registros dados
    pub async fn replace_all(&self, records: &[T]) -> AppResult<()> {
        let documents = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.replace_collection(T::COLLECTION, documents).await
    }
}

impl Repository<User> {
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|u| u.email.to_lowercase() == email))
    }

    /// ¿Usa otro usuario (distinto de `except_id`) este email?
    pub async fn email_taken(&self, email: &str, except_id: Option<&str>) -> AppResult<bool> {
        let email = email.to_lowercase();
        Ok(self
            .list()
            .await?
            .iter()
            .any(|u| Some(u.id.as_str()) != except_id && u.email.to_lowercase() == email))
    }
}

impl Repository<Trip> {
    pub async fn append(&self, trip: &Trip) -> AppResult<()> {
        self.upsert(trip).await
    }
}

pub type VehicleRepository = Repository<Vehicle>;
pub type DriverRepository = Repository<Driver>;
pub type UserRepository = Repository<User>;
pub type TripRepository = Repository<Trip>;
pub type RequestRepository = Repository<Request>;
