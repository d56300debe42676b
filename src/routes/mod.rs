//! Rutas HTTP
//!
//! Cada recurso expone su propio router; `create_router` los monta bajo
//! `/api` con CORS y trazas de peticiones.

pub mod auth_routes;
pub mod driver_routes;
pub mod request_routes;
pub mod trip_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la API
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(auth_routes::create_auth_router())
        .merge(user_routes::create_user_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(driver_routes::create_driver_router())
        .merge(trip_routes::create_trip_router())
        .merge(request_routes::create_request_router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}
