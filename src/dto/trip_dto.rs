use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub date: Option<String>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

// Filtros de GET /api/trips
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
}
