//! Servicio de autenticación
//!
//! Registro con aprobación posterior, login y perfil propio. Las
//! contraseñas se guardan con bcrypt; los tokens los emite `JwtService`.

use bcrypt::{hash, verify};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UpdateProfileRequest,
};
use crate::models::{Role, User, UserResponse, UserStatus};
use crate::repositories::{DocumentStore, UserRepository};
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppError, AppResult};
use crate::utils::jwt::JwtService;
use crate::utils::validation::{normalize_email, require_fields};

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    hash(password, cost).map_err(|e| AppError::Hash(e.to_string()))
}

/// Un hash corrupto cuenta como contraseña incorrecta
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtService>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, jwt: Arc<JwtService>, bcrypt_cost: u32) -> Self {
        Self {
            users: UserRepository::new(store),
            jwt,
            bcrypt_cost,
        }
    }

    /// Registrar un usuario nuevo en estado `pending`
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        require_fields(
            &[
                request.email.as_deref(),
                request.password.as_deref(),
                request.last_name.as_deref(),
                request.first_name.as_deref(),
                request.middle_name.as_deref(),
                request.position.as_deref(),
            ],
            "All fields are required: email, password, lastName, firstName, middleName, position",
        )?;
        request.validate()?;

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        if self.users.email_taken(&email, None).await? {
            return Err(conflict_error("User already exists"));
        }

        let name = format!(
            "{} {} {}",
            request.last_name.unwrap_or_default().trim(),
            request.first_name.unwrap_or_default().trim(),
            request.middle_name.unwrap_or_default().trim()
        );
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name: name.trim().to_string(),
            role: Role::User,
            position: request.position,
            status: Some(UserStatus::Pending),
            password_hash: hash_password(request.password.as_deref().unwrap_or_default(), self.bcrypt_cost)?,
            phone: None,
            created_at: Some(Utc::now()),
        };
        self.users.upsert(&user).await?;
        info!("📝 Registro pendiente de aprobación: {}", user.email);

        Ok(RegisterResponse {
            ok: true,
            status: "pending".to_string(),
            user: UserResponse::from(user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(&request.password, &user.password_hash) {
            warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(invalid());
        }

        match user.status {
            Some(UserStatus::Pending) => {
                return Err(forbidden_error("Account pending approval"))
            }
            Some(UserStatus::Rejected) => {
                return Err(forbidden_error("Account rejected"))
            }
            _ => {}
        }

        let token = self.jwt.generate_token(&user)?;
        info!("✅ Login de {} ({})", user.email, user.role);
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn profile(&self, user_id: &str) -> AppResult<UserResponse> {
        self.users
            .get(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User", user_id))
    }

    /// Actualiza el perfil propio y devuelve un token con los datos nuevos
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<AuthResponse> {
        request.validate()?;
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| not_found_error("User", user_id))?;

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email.filter(|e| !e.trim().is_empty()) {
            let email = normalize_email(&email);
            if self.users.email_taken(&email, Some(user_id)).await? {
                return Err(conflict_error("Email already in use"));
            }
            user.email = email;
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            user.password_hash = hash_password(&password, self.bcrypt_cost)?;
        }

        self.users.upsert(&user).await?;
        let token = self.jwt.generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
