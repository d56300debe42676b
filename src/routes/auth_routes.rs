use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UpdateProfileRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UserResponse;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Registro, login y perfil propio
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/me", get(get_me).put(update_me))
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.store.clone(), state.jwt.clone(), state.config.bcrypt_cost)
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = service(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service(&state).login(request).await?))
}

async fn get_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(service(&state).profile(&user.id).await?))
}

async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service(&state).update_profile(&user.id, request).await?))
}
