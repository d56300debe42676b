use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::dispatch::DispatchLifecycle;
use crate::dto::request_dto::CreateRequestRequest;
use crate::models::{Request, RequestPatch};
use crate::repositories::{
    DocumentStore, DriverRepository, RequestRepository, UserRepository, VehicleRepository,
};
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};
use crate::utils::validation::{parse_timestamp, require_fields};

pub struct RequestController {
    requests: RequestRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    users: UserRepository,
    lifecycle: DispatchLifecycle,
}

impl RequestController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            requests: RequestRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store.clone()),
            drivers: DriverRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            lifecycle: DispatchLifecycle::new(store),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Request>> {
        self.requests.list().await
    }

    /// Nueva solicitud `planned`. Las referencias se comprueban solo aquí.
    pub async fn create(&self, request: CreateRequestRequest) -> AppResult<Request> {
        require_fields(
            &[
                request.vehicle_id.as_deref(),
                request.driver_id.as_deref(),
                request.from.as_deref(),
                request.to.as_deref(),
            ],
            "vehicleId, driverId, from, to are required",
        )?;
        let depart_at = match request.depart_at.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => parse_timestamp(raw, "departAt")?,
            None => Utc::now(),
        };

        let vehicle_id = request.vehicle_id.unwrap_or_default();
        let driver_id = request.driver_id.unwrap_or_default();
        let driver_exists = self.drivers.exists(&driver_id).await? || self.users.exists(&driver_id).await?;
        if !driver_exists || !self.vehicles.exists(&vehicle_id).await? {
            return Err(bad_request_error("Invalid driver or vehicle"));
        }

        let created = Request::planned(
            vehicle_id,
            driver_id,
            request.from.unwrap_or_default(),
            request.to.unwrap_or_default(),
            depart_at,
            request.notes.unwrap_or_default(),
        );
        self.requests.upsert(&created).await?;
        info!("📋 Solicitud {} planificada: {} -> {}", created.id, created.from, created.to);
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: RequestPatch) -> AppResult<Request> {
        self.lifecycle.update_request(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.requests.delete(id).await? {
            return Err(not_found_error("Request", id));
        }
        info!("🗑️ Solicitud {} eliminada", id);
        Ok(())
    }
}
