use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::trip_controller::TripController;
use crate::dto::trip_dto::{CreateTripRequest, TripQuery};
use crate::middleware::auth::{AuthenticatedUser, ADMIN_ROLES};
use crate::models::Trip;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new().route("/trips", get(list_trips).post(create_trip))
}

async fn list_trips(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<TripQuery>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let controller = TripController::new(state.store.clone());
    Ok(Json(controller.list(query).await?))
}

async fn create_trip(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    user.require_role(ADMIN_ROLES)?;
    let controller = TripController::new(state.store.clone());
    let trip = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}
