//! Modelo de User
//!
//! Usuarios del sistema con rol, puesto y estado de aprobación.
//! El hash de la contraseña nunca sale en las respuestas de la API,
//! para eso existe `UserResponse`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Puesto que identifica a un usuario como conductor
pub const DRIVER_POSITION: &str = "Водій";

/// Puestos válidos de la unidad
pub const UNIT_POSITIONS: [&str; 5] = [
    "Водій",
    "Старший Водій",
    "Механік водій",
    "Начальник автослужби",
    "Старший технік автопарку",
];

/// Roles del sistema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// Rango para decidir qué cuenta se conserva al fusionar duplicados
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de la cuenta en el flujo de aprobación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Pending,
    Rejected,
}

/// Usuario persistido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_driver(&self) -> bool {
        self.position.as_deref() == Some(DRIVER_POSITION)
    }
}

/// Response de usuario para la API (sin password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            position: user.position,
            status: user.status,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(Role::SuperAdmin.to_string(), "superadmin");
        assert!("root".parse::<Role>().is_err());
        assert!(Role::SuperAdmin.rank() > Role::Admin.rank());
    }

    #[test]
    fn test_response_hides_password_hash() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "admin@local",
            "role": "superadmin",
            "passwordHash": "$2b$10$abc",
            "name": "Адміністратор"
        }))
        .unwrap();

        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body["role"], "superadmin");
    }

    #[test]
    fn test_reads_epoch_millis_created_at() {
        let user: User = serde_json::from_value(json!({
            "id": "1700000000000",
            "email": "chief@unit.ua",
            "role": "superadmin",
            "createdAt": 1700000000000i64
        }))
        .unwrap();

        assert_eq!(user.created_at.unwrap().timestamp_millis(), 1700000000000);
        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(body["createdAt"], "2023-11-14T22:13:20Z");
    }
}
