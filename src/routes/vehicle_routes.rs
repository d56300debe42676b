use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::VehicleInput;
use crate::middleware::auth::{AuthenticatedUser, ADMIN_ROLES};
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Lectura pública, escritura para admin
pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<VehicleInput>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = VehicleController::new(state.store.clone());
    let vehicle = controller.create(input).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(input): Json<VehicleInput>,
) -> Result<Json<Vehicle>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.update(&id, input).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = VehicleController::new(state.store.clone());
    controller.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
