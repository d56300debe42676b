use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::dto::trip_dto::{CreateTripRequest, TripQuery};
use crate::models::Trip;
use crate::repositories::{DocumentStore, DriverRepository, TripRepository, UserRepository, VehicleRepository};
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::{parse_timestamp, require_fields, validate_positive};

pub struct TripController {
    trips: TripRepository,
    drivers: DriverRepository,
    users: UserRepository,
    vehicles: VehicleRepository,
}

impl TripController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            trips: TripRepository::new(store.clone()),
            drivers: DriverRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store),
        }
    }

    pub async fn list(&self, query: TripQuery) -> AppResult<Vec<Trip>> {
        Ok(self
            .trips
            .list()
            .await?
            .into_iter()
            .filter(|t| query.driver_id.as_deref().map_or(true, |id| t.driver_id == id))
            .filter(|t| query.vehicle_id.as_deref().map_or(true, |id| t.vehicle_id == id))
            .collect())
    }

    /// Registra un viaje real; conductor y vehículo deben existir
    pub async fn create(&self, request: CreateTripRequest) -> AppResult<Trip> {
        let message = "driverId, vehicleId, distanceKm are required";
        require_fields(&[request.driver_id.as_deref(), request.vehicle_id.as_deref()], message)?;
        let distance_km = request
            .distance_km
            .filter(|km| validate_positive(*km).is_ok())
            .ok_or_else(|| bad_request_error(message))?;
        let date = match request.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => parse_timestamp(raw, "date")?,
            None => Utc::now(),
        };

        let driver_id = request.driver_id.unwrap_or_default();
        let vehicle_id = request.vehicle_id.unwrap_or_default();
        let driver_exists = self.drivers.exists(&driver_id).await? || self.users.exists(&driver_id).await?;
        if !driver_exists || !self.vehicles.exists(&vehicle_id).await? {
            return Err(bad_request_error("Invalid driver or vehicle"));
        }

        let trip = Trip::new(driver_id, vehicle_id, date, distance_km, request.notes.unwrap_or_default());
        self.trips.append(&trip).await?;
        info!("🛣️ Viaje registrado: {} km (vehículo {})", trip.distance_km, trip.vehicle_id);
        Ok(trip)
    }
}
