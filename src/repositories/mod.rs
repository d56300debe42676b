//! Capa de persistencia
//!
//! `DocumentStore` abstrae el backend; los repositorios tipados
//! (`VehicleRepository`, `TripRepository`, ...) son lo único que usa la
//! lógica de negocio.

pub mod json_file_store;
pub mod legacy;
pub mod memory_store;
pub mod pg_store;
pub mod repository;
pub mod store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
pub use repository::{
    DriverRepository, Record, Repository, RequestRepository, TripRepository, UserRepository,
    VehicleRepository,
};
pub use store::{Collection, DocumentStore, Snapshot};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::database::DatabaseConfig;
use crate::config::{EnvironmentConfig, StorageBackend};

/// Construir el almacén configurado
pub async fn build_store(config: &EnvironmentConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.storage_backend {
        StorageBackend::Memory => {
            info!("🧠 Usando almacén en memoria");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::File => {
            info!("📄 Usando almacén JSON en {}", config.db_path.display());
            let store = JsonFileStore::new(config.db_path.clone());
            store.snapshot().await?;
            if store.is_in_memory().await {
                warn!("⚠️ {} no es escribible: los datos no sobrevivirán al reinicio", config.db_path.display());
            }
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_environment(config)?;
            info!("🐘 Conectando a PostgreSQL en {}", db_config.masked_url());
            let pool = db_config.create_pool().await?;
            let store = PgStore::new(pool);
            store.init_schema().await?;
            Arc::new(store)
        }
    };
    Ok(store)
}
