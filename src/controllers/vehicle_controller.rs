use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::VehicleInput;
use crate::models::{Vehicle, VehicleStatus};
use crate::repositories::{DocumentStore, VehicleRepository};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::require_fields;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: VehicleRepository::new(store),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Vehicle> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    pub async fn create(&self, input: VehicleInput) -> AppResult<Vehicle> {
        require_fields(
            &[
                input.make.as_deref(),
                input.model.as_deref(),
                input.registration_number.as_deref(),
            ],
            "make, model, registrationNumber are required",
        )?;
        input.validate()?;

        // estados desconocidos se guardan como `base`
        let status = input
            .status
            .as_deref()
            .and_then(VehicleStatus::normalize)
            .unwrap_or_default();

        let vehicle = Vehicle {
            id: input
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            make: input.make.unwrap_or_default(),
            model: input.model.unwrap_or_default(),
            vehicle_type: input.vehicle_type.unwrap_or_default(),
            status,
            assigned_unit: input.assigned_unit.unwrap_or_default(),
            vin: input.vin,
            registration_number: input.registration_number,
            year: input.year,
            mileage: input.mileage,
            notes: input.notes,
        };
        self.repository.upsert(&vehicle).await?;
        info!("🚚 Vehículo creado: {} {} ({})", vehicle.make, vehicle.model, vehicle.id);
        Ok(vehicle)
    }

    /// Aplica los campos presentes; el id no cambia y un estado
    /// desconocido conserva el anterior
    pub async fn update(&self, id: &str, input: VehicleInput) -> AppResult<Vehicle> {
        input.validate()?;
        let mut vehicle = self.get_by_id(id).await?;

        if let Some(status) = input.status.as_deref().and_then(VehicleStatus::normalize) {
            vehicle.status = status;
        }
        if let Some(make) = input.make {
            vehicle.make = make;
        }
        if let Some(model) = input.model {
            vehicle.model = model;
        }
        if let Some(vehicle_type) = input.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(unit) = input.assigned_unit {
            vehicle.assigned_unit = unit;
        }
        if input.vin.is_some() {
            vehicle.vin = input.vin;
        }
        if input.registration_number.is_some() {
            vehicle.registration_number = input.registration_number;
        }
        if input.year.is_some() {
            vehicle.year = input.year;
        }
        if input.mileage.is_some() {
            vehicle.mileage = input.mileage;
        }
        if input.notes.is_some() {
            vehicle.notes = input.notes;
        }

        self.repository.upsert(&vehicle).await?;
        Ok(vehicle)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle", id));
        }
        info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }
}
