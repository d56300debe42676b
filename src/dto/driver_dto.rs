use serde::Deserialize;

// Payload de alta y edición de conductores
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInput {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub license_number: Option<String>,
    pub rank: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}
