//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado operativo.
//! Los registros se guardan en JSON con claves camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado del vehículo: en base, en viaje o en reparación
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum VehicleStatus {
    #[default]
    Base,
    Trip,
    Repair,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Base => "base",
            VehicleStatus::Trip => "trip",
            VehicleStatus::Repair => "repair",
        }
    }

    /// Normaliza un estado crudo, incluidos los valores heredados
    /// (`in-service`, `decommissioned`). `None` si no se reconoce.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim() {
            "base" | "in-service" | "decommissioned" => Some(VehicleStatus::Base),
            "trip" => Some(VehicleStatus::Trip),
            "repair" => Some(VehicleStatus::Repair),
            _ => None,
        }
    }
}

impl From<String> for VehicleStatus {
    fn from(raw: String) -> Self {
        VehicleStatus::normalize(&raw).unwrap_or_default()
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "type", default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub assigned_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Vehicle {
    pub fn is_on_trip(&self) -> bool {
        self.status == VehicleStatus::Trip
    }
}
