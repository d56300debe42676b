//! Modelo de Driver
//!
//! Fichas de conductores. Un usuario con puesto de conductor también
//! cuenta como conductor en los listados y en las comprobaciones de referencia.

use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Vista resumida para el listado de conductores
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Driver> for DriverSummary {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.clone(),
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            position: driver.rank.clone(),
            phone: driver.phone.clone().unwrap_or_default(),
            email: None,
        }
    }
}

impl From<&User> for DriverSummary {
    /// El nombre se guarda como "Apellido Nombre Patronímico"
    fn from(user: &User) -> Self {
        let mut parts = user.name.split_whitespace();
        let last_name = parts.next().unwrap_or_default().to_string();
        let first_name = parts.next().unwrap_or_default().to_string();
        Self {
            id: user.id.clone(),
            first_name,
            last_name,
            position: user.position.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            email: Some(user.email.clone()),
        }
    }
}
