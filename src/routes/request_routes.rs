use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::request_controller::RequestController;
use crate::dto::request_dto::CreateRequestRequest;
use crate::middleware::auth::{AuthenticatedUser, ADMIN_ROLES};
use crate::models::{Request, RequestPatch};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Solicitudes de despacho. `PUT /requests/:id` pasa por el ciclo de
/// despacho, que actualiza vehículo y viajes.
pub fn create_request_router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/:id", put(update_request).delete(delete_request))
}

async fn list_requests(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Request>>, AppError> {
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn create_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<Request>), AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = RequestController::new(state.store.clone());
    let created = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(patch): Json<RequestPatch>,
) -> Result<Json<Request>, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = RequestController::new(state.store.clone());
    Ok(Json(controller.update(&id, patch).await?))
}

async fn delete_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = RequestController::new(state.store.clone());
    controller.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
