use serde::Deserialize;
use validator::Validate;

// Alta directa de un usuario activo (superadmin)
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub role: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

// Cambio de rol y puesto
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub new_role: Option<String>,
    pub new_position: Option<String>,
}
