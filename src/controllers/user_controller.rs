use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest};
use crate::models::user::UNIT_POSITIONS;
use crate::models::{Role, User, UserResponse, UserStatus};
use crate::repositories::{DocumentStore, UserRepository};
use crate::services::auth_service::hash_password;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppResult};
use crate::utils::validation::{normalize_email, require_fields};

fn parse_role(raw: &str) -> AppResult<Role> {
    raw.trim().parse().map_err(|_| bad_request_error("Invalid role"))
}

pub struct UserController {
    users: UserRepository,
    bcrypt_cost: u32,
}

impl UserController {
    pub fn new(store: Arc<dyn DocumentStore>, bcrypt_cost: u32) -> Self {
        Self {
            users: UserRepository::new(store),
            bcrypt_cost,
        }
    }

    async fn find(&self, id: &str) -> AppResult<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("User", id))
    }

    /// Registros pendientes de aprobación
    pub async fn registrations(&self) -> AppResult<Vec<UserResponse>> {
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|u| u.status == Some(UserStatus::Pending))
            .map(UserResponse::from)
            .collect())
    }

    pub async fn set_status(&self, id: &str, status: UserStatus) -> AppResult<UserResponse> {
        let mut user = self.find(id).await?;
        user.status = Some(status);
        self.users.upsert(&user).await?;
        info!("👤 Usuario {} ahora {:?}", user.email, status);
        Ok(UserResponse::from(user))
    }

    pub async fn list(&self) -> AppResult<Vec<UserResponse>> {
        Ok(self.users.list().await?.into_iter().map(UserResponse::from).collect())
    }

    /// Alta directa de un usuario ya activo
    pub async fn create(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        require_fields(
            &[request.email.as_deref(), request.password.as_deref()],
            "email and password are required",
        )?;
        request.validate()?;

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        if self.users.email_taken(&email, None).await? {
            return Err(conflict_error("User already exists"));
        }
        let role = match request.role.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(raw) => parse_role(raw)?,
            None => Role::User,
        };
        let name = request.name.unwrap_or_else(|| {
            [request.last_name, request.first_name, request.middle_name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        });

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name: name.trim().to_string(),
            role,
            position: request.position,
            status: Some(UserStatus::Active),
            password_hash: hash_password(request.password.as_deref().unwrap_or_default(), self.bcrypt_cost)?,
            phone: request.phone,
            created_at: Some(Utc::now()),
        };
        self.users.upsert(&user).await?;
        info!("👤 Usuario creado: {} ({})", user.email, user.role);
        Ok(UserResponse::from(user))
    }

    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> AppResult<UserResponse> {
        request.validate()?;
        let mut user = self.find(id).await?;

        let role = request
            .role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(parse_role)
            .transpose()?;

        if let Some(email) = request.email.filter(|e| !e.trim().is_empty()) {
            let email = normalize_email(&email);
            if self.users.email_taken(&email, Some(id)).await? {
                return Err(conflict_error("Email already in use"));
            }
            user.email = email;
        }
        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            user.password_hash = hash_password(&password, self.bcrypt_cost)?;
        }

        self.users.upsert(&user).await?;
        Ok(UserResponse::from(user))
    }

    /// Borra un usuario. Nadie puede borrarse a sí mismo ni dejar el
    /// sistema sin superadmin.
    pub async fn delete(&self, actor_id: &str, id: &str) -> AppResult<()> {
        let users = self.users.list().await?;
        let target = users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found_error("User", id))?;

        if actor_id == id {
            return Err(bad_request_error("You cannot delete yourself"));
        }
        if target.role == Role::SuperAdmin {
            let superadmins = users.iter().filter(|u| u.role == Role::SuperAdmin).count();
            if superadmins <= 1 {
                return Err(bad_request_error("Cannot delete the last superadmin"));
            }
        }

        self.users.delete(id).await?;
        info!("🗑️ Usuario {} eliminado", id);
        Ok(())
    }

    /// Cambio de rol y puesto dentro de la unidad
    pub async fn update_role(&self, id: &str, request: UpdateRoleRequest) -> AppResult<UserResponse> {
        let mut user = self.find(id).await?;

        let position = request
            .new_position
            .filter(|p| UNIT_POSITIONS.contains(&p.as_str()))
            .ok_or_else(|| bad_request_error("Invalid position"))?;
        if let Some(raw) = request.new_role.as_deref().filter(|r| !r.trim().is_empty()) {
            user.role = parse_role(raw)?;
        }
        user.position = Some(position);

        self.users.upsert(&user).await?;
        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;

    fn controller() -> UserController {
        UserController::new(Arc::new(MemoryStore::new()), 4)
    }

    fn create_request(email: &str, role: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: Some(email.into()),
            password: Some("secret".into()),
            role: Some(role.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_last_superadmin_cannot_be_deleted() {
        let users = controller();
        let chief = users.create(create_request("chief@unit.ua", "superadmin")).await.unwrap();
        let deputy = users.create(create_request("deputy@unit.ua", "superadmin")).await.unwrap();

        let err = users.delete(&chief.id, &chief.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Bad request: You cannot delete yourself");

        users.delete(&chief.id, &deputy.id).await.unwrap();
        let admin = users.create(create_request("admin@unit.ua", "admin")).await.unwrap();
        let err = users.delete(&admin.id, &chief.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Cannot delete the last superadmin");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_role_and_taken_email() {
        let users = controller();
        let first = users.create(create_request("first@unit.ua", "user")).await.unwrap();
        users.create(create_request("second@unit.ua", "user")).await.unwrap();

        let err = users
            .update(&first.id, UpdateUserRequest { role: Some("root".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = users
            .update(&first.id, UpdateUserRequest { email: Some("SECOND@unit.ua".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_role_requires_unit_position() {
        let users = controller();
        let user = users.create(create_request("driver@unit.ua", "user")).await.unwrap();

        let err = users
            .update_role(&user.id, UpdateRoleRequest { new_role: Some("admin".into()), new_position: Some("Кухар".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let updated = users
            .update_role(&user.id, UpdateRoleRequest { new_role: Some("admin".into()), new_position: Some("Водій".into()) })
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.position.as_deref(), Some("Водій"));
    }
}
