use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::DriverInput;
use crate::middleware::auth::{AuthenticatedUser, ADMIN_ROLES};
use crate::models::{Driver, DriverSummary};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route(
            "/drivers/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let controller = DriverController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(state.store.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn create_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<DriverInput>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = DriverController::new(state.store.clone());
    let driver = controller.create(input).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

async fn update_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(input): Json<DriverInput>,
) -> Result<Json<Driver>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = DriverController::new(state.store.clone());
    Ok(Json(controller.update(&id, input).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = DriverController::new(state.store.clone());
    controller.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
