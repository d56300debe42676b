//! Modelo de Request
//!
//! Una salida planificada de un vehículo con su conductor. El campo
//! `status` lo gobierna el ciclo de despacho (`crate::dispatch`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dispatch::RequestStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub depart_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrive_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kilometers: Option<f64>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Nueva solicitud en estado `planned`
    pub fn planned(
        vehicle_id: String,
        driver_id: String,
        from: String,
        to: String,
        depart_at: DateTime<Utc>,
        notes: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vehicle_id,
            driver_id,
            from,
            to,
            depart_at,
            arrive_at: None,
            kilometers: None,
            status: RequestStatus::Planned,
            notes,
            created_at: Utc::now(),
        }
    }
}

/// Actualización parcial de una solicitud (`PUT /api/requests/:id`).
///
/// Los campos llegan como texto y `status` como JSON arbitrario; la
/// validación la hace el ciclo de despacho para poder responder 400 en
/// lugar del rechazo genérico de serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPatch {
    pub status: Option<Value>,
    pub notes: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub depart_at: Option<String>,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
}

impl RequestPatch {
    pub fn status(status: &str) -> Self {
        Self {
            status: Some(Value::from(status)),
            ..Default::default()
        }
    }
}
