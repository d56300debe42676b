//! Modelo de Trip
//!
//! Registro de viajes, solo de anexado. Las entradas sintéticas del
//! ciclo de despacho llevan `distance_km = 0`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub driver_id: String,
    pub vehicle_id: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub notes: String,
}

impl Trip {
    pub fn new(
        driver_id: String,
        vehicle_id: String,
        date: DateTime<Utc>,
        distance_km: f64,
        notes: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            driver_id,
            vehicle_id,
            date,
            distance_km,
            notes,
        }
    }

    /// Entrada de cero kilómetros generada por el ciclo de despacho
    pub fn synthetic(driver_id: &str, vehicle_id: &str, date: DateTime<Utc>, notes: String) -> Self {
        Self::new(driver_id.to_string(), vehicle_id.to_string(), date, 0.0, notes)
    }
}
