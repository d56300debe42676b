use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest};
use crate::middleware::auth::{AuthenticatedUser, ADMIN_ROLES, SUPERADMIN_ONLY};
use crate::models::{UserResponse, UserStatus};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Aprobación de registros (admin) y gestión de usuarios (superadmin)
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/registrations", get(list_registrations))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .route("/users/:id/approve", post(approve_user))
        .route("/users/:id/reject", post(reject_user))
        .route("/users/:id/role", put(update_user_role))
}

fn controller(state: &AppState) -> UserController {
    UserController::new(state.store.clone(), state.config.bcrypt_cost)
}

async fn list_registrations(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    Ok(Json(controller(&state).registrations().await?))
}

async fn approve_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    Ok(Json(controller(&state).set_status(&id, UserStatus::Active).await?))
}

async fn reject_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    Ok(Json(controller(&state).set_status(&id, UserStatus::Rejected).await?))
}

async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    user.require_role(SUPERADMIN_ONLY)?;
    Ok(Json(controller(&state).list().await?))
}

async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    user.require_role(SUPERADMIN_ONLY)?;
    let created = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    user.require_role(SUPERADMIN_ONLY)?;
    Ok(Json(controller(&state).update(&id, request).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.require_role(SUPERADMIN_ONLY)?;
    controller(&state).delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_user_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_role(SUPERADMIN_ONLY)?;
    let updated = controller(&state).update_role(&id, request).await?;
    Ok(Json(json!({
        "message": "User role and position updated successfully",
        "user": updated
    })))
}
