//! Ciclo de vida de una solicitud de despacho
//!
//! `DispatchLifecycle::update_request` aplica una actualización parcial y,
//! si el estado cambia según la tabla de transiciones, actualiza el estado
//! del vehículo y anexa viajes sintéticos de cero kilómetros.
//!
//! Los efectos secundarios son de mejor esfuerzo: si fallan se registran y
//! la actualización de la solicitud se guarda igualmente. No hay
//! transacción entre las escrituras, así que vehículo, viajes y solicitud
//! pueden quedar desalineados tras un error o con dos actualizaciones
//! concurrentes sobre la misma solicitud.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::sanitize::{departure_note, return_note};
use super::status::RequestStatus;
use super::transitions::{DispatchEffect, DispatchTransition};
use crate::models::{Request, RequestPatch, Trip, VehicleStatus};
use crate::repositories::{
    DocumentStore, DriverRepository, RequestRepository, TripRepository, UserRepository,
    VehicleRepository,
};
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};
use crate::utils::validation::parse_timestamp;

/// Resultado de aplicar un efecto
#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    pub effect: DispatchEffect,
    pub vehicle_status: Option<VehicleStatus>,
    pub trip: Option<Trip>,
}

#[derive(Clone)]
pub struct DispatchLifecycle {
    requests: RequestRepository,
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    users: UserRepository,
    trips: TripRepository,
}

/// Estado pedido por el payload. `null` y el texto vacío cuentan como
/// ausentes; cualquier otro valor debe coincidir exactamente.
fn requested_status(patch: &RequestPatch) -> AppResult<Option<RequestStatus>> {
    match &patch.status {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.is_empty() => Ok(None),
        Some(Value::String(raw)) => raw
            .parse::<RequestStatus>()
            .map(Some)
            .map_err(|_| bad_request_error("Invalid status")),
        Some(_) => Err(bad_request_error("Invalid status")),
    }
}

impl DispatchLifecycle {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            requests: RequestRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store.clone()),
            drivers: DriverRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            trips: TripRepository::new(store),
        }
    }

    /// Aplicar una actualización parcial a la solicitud `id`.
    ///
    /// Errores: `NotFound` si no existe, `BadRequest` si el estado o
    /// `departAt` no son válidos. En ambos casos no se modifica nada.
    pub async fn update_request(&self, id: &str, patch: RequestPatch) -> AppResult<Request> {
        let previous = self
            .requests
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Request", id))?;

        let next_status = requested_status(&patch)?;
        let depart_at = patch
            .depart_at
            .as_deref()
            .map(|raw| parse_timestamp(raw, "departAt"))
            .transpose()?;

        let mut updated = previous.clone();
        if let Some(status) = next_status {
            updated.status = status;
        }
        if let Some(notes) = patch.notes {
            updated.notes = notes;
        }
        if let Some(from) = patch.from {
            updated.from = from;
        }
        if let Some(to) = patch.to {
            updated.to = to;
        }
        if let Some(depart_at) = depart_at {
            updated.depart_at = depart_at;
        }
        if let Some(driver_id) = patch.driver_id {
            updated.driver_id = driver_id;
        }
        if let Some(vehicle_id) = patch.vehicle_id {
            updated.vehicle_id = vehicle_id;
        }

        if let Some(to) = next_status {
            let transition = DispatchTransition::new(previous.status, to);
            if let Some(effect) = transition.effect() {
                debug!("🔀 Solicitud {}: {} -> {} ({:?})", id, transition.from, transition.to, effect);
                match self.apply_effect(effect, &updated, Utc::now()).await {
                    Ok(outcome) => {
                        if let Some(status) = outcome.vehicle_status {
                            info!("🚚 Vehículo {} ahora en estado '{}' (solicitud {})", updated.vehicle_id, status, id);
                        }
                    }
                    Err(e) => {
                        error!("❌ Efecto secundario de la solicitud {} falló: {}", id, e);
                    }
                }
            }
        }

        self.requests.upsert(&updated).await?;
        Ok(updated)
    }

    /// El conductor puede ser una ficha de conductor o un usuario
    async fn driver_exists(&self, driver_id: &str) -> AppResult<bool> {
        Ok(self.drivers.exists(driver_id).await? || self.users.exists(driver_id).await?)
    }

    /// Ejecuta el efecto si la guarda del vehículo lo permite
    pub async fn apply_effect(
        &self,
        effect: DispatchEffect,
        request: &Request,
        now: DateTime<Utc>,
    ) -> AppResult<EffectOutcome> {
        let vehicle = self.vehicles.get(&request.vehicle_id).await?;
        let mut outcome = EffectOutcome {
            effect,
            vehicle_status: None,
            trip: None,
        };

        if !effect.permits(vehicle.as_ref()) {
            return Ok(outcome);
        }
        let Some(mut vehicle) = vehicle else {
            // salida sin vehículo: nada que marcar ni registrar
            return Ok(outcome);
        };
        let driver_exists = self.driver_exists(&request.driver_id).await?;

        let (status, date, note) = match effect {
            DispatchEffect::Depart => (VehicleStatus::Trip, request.depart_at, departure_note(request)),
            DispatchEffect::Return => (VehicleStatus::Base, now, return_note(request, request.status)),
        };

        vehicle.status = status;
        self.vehicles.upsert(&vehicle).await?;
        outcome.vehicle_status = Some(status);

        if driver_exists {
            let trip = Trip::synthetic(&request.driver_id, &request.vehicle_id, date, note);
            self.trips.append(&trip).await?;
            outcome.trip = Some(trip);
        }

        Ok(outcome)
    }
}
