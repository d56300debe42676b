//! Autenticación JWT
//!
//! `AuthenticatedUser` es un extractor: cualquier handler que lo reciba
//! exige un token Bearer válido. Los permisos por rol se comprueban con
//! `require_role`.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    models::Role,
    state::AppState,
    utils::{
        errors::{forbidden_error, AppError},
        jwt::extract_token_from_header,
    },
};

/// Admin o superadmin
pub const ADMIN_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];
pub const SUPERADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

/// Usuario autenticado a partir de los claims del token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl AuthenticatedUser {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(forbidden_error("Forbidden"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthorized = || AppError::Unauthorized("Unauthorized".to_string());

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;
        let token = extract_token_from_header(auth_header).map_err(|_| unauthorized())?;
        let claims = state.jwt.verify_token(token).map_err(|_| unauthorized())?;

        Ok(Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let admin = AuthenticatedUser {
            id: "u1".into(),
            email: "a@unit.ua".into(),
            role: Role::Admin,
            name: String::new(),
        };
        assert!(admin.require_role(ADMIN_ROLES).is_ok());
        assert!(matches!(admin.require_role(SUPERADMIN_ONLY), Err(AppError::Forbidden(_))));
    }
}
