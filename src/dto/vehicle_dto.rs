use serde::Deserialize;
use validator::Validate;

// Payload de alta y edición de vehículos; en la edición solo se
// aplican los campos presentes
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    pub id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub status: Option<String>,
    pub assigned_unit: Option<String>,
    pub vin: Option<String>,
    pub registration_number: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 0.0))]
    pub mileage: Option<f64>,
    pub notes: Option<String>,
}
