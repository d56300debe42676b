use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fleet_dispatch::config::EnvironmentConfig;
use fleet_dispatch::repositories::{DocumentStore, MemoryStore};
use fleet_dispatch::routes::create_router;
use fleet_dispatch::services::bootstrap;
use fleet_dispatch::state::AppState;

async fn create_test_app() -> Router {
    let config = EnvironmentConfig {
        bcrypt_cost: 4,
        jwt_secret: "test-secret".to_string(),
        ..EnvironmentConfig::default()
    };
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    bootstrap::run(store.clone(), &config).await.unwrap();
    create_router(AppState::new(config, store))
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, "admin@local", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let (status, body) = call(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["time"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_test_app().await;

    let (status, body) = call(&app, Method::GET, "/api/requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = call(&app, Method::GET, "/api/requests", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // los vehículos son públicos
    let (status, body) = call(&app, Method::GET, "/api/vehicles", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_registration_approval_flow() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "Driver@Unit.UA",
            "password": "secret",
            "lastName": "Петренко",
            "firstName": "Іван",
            "middleName": "Олексійович",
            "position": "Водій"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert!(body["user"].get("passwordHash").is_none());
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = login(&app, "driver@unit.ua", "secret").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account pending approval");

    let (status, body) = call(&app, Method::GET, "/api/registrations", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("/api/users/{}/approve", user_id);
    let (status, body) = call(&app, Method::POST, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = login(&app, "driver@unit.ua", "secret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");

    // un usuario normal no gestiona solicitudes
    let token = body["token"].as_str().unwrap().to_string();
    let (status, body) = call(&app, Method::PUT, "/api/requests/r1", Some(&token), Some(json!({"status": "done"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");

    let (status, _) = login(&app, "driver@unit.ua", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dispatch_lifecycle_over_http() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;

    let (_, vehicles) = call(&app, Method::GET, "/api/vehicles", None, None).await;
    let vehicle_id = vehicles[0]["id"].as_str().unwrap().to_string();

    let (status, driver) = call(
        &app,
        Method::POST,
        "/api/drivers",
        Some(&admin),
        Some(json!({"firstName": "Іван", "lastName": "Петренко", "licenseNumber": "AB123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let driver_id = driver["id"].as_str().unwrap().to_string();

    let (status, request) = call(
        &app,
        Method::POST,
        "/api/requests",
        Some(&admin),
        Some(json!({
            "vehicleId": vehicle_id,
            "driverId": driver_id,
            "from": "Base",
            "to": "Field",
            "departAt": "2024-01-01T08:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "planned");
    let request_id = request["id"].as_str().unwrap().to_string();
    let request_uri = format!("/api/requests/{}", request_id);
    let vehicle_uri = format!("/api/vehicles/{}", vehicle_id);
    let trips_uri = format!("/api/trips?vehicleId={}", vehicle_id);

    let (status, body) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"status": "in-progress"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in-progress");

    let (_, vehicle) = call(&app, Method::GET, &vehicle_uri, None, None).await;
    assert_eq!(vehicle["status"], "trip");
    let (_, trips) = call(&app, Method::GET, &trips_uri, Some(&admin), None).await;
    let trips = trips.as_array().unwrap().clone();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["distanceKm"], 0.0);
    assert_eq!(trips[0]["notes"], format!("[dispatch] старт: Base → Field (request #{})", request_id));

    let (status, body) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"status": "bogus"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status");

    let (status, _) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"status": "done"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, vehicle) = call(&app, Method::GET, &vehicle_uri, None, None).await;
    assert_eq!(vehicle["status"], "base");
    let (_, trips) = call(&app, Method::GET, &trips_uri, Some(&admin), None).await;
    assert_eq!(trips.as_array().unwrap().len(), 2);

    let (status, _) = call(&app, Method::DELETE, &request_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"status": "done"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_planned_request(app: &Router, token: &str) -> String {
    let (_, vehicles) = call(app, Method::GET, "/api/vehicles", None, None).await;
    let vehicle_id = vehicles[0]["id"].as_str().unwrap().to_string();
    let (_, driver) = call(
        app,
        Method::POST,
        "/api/drivers",
        Some(token),
        Some(json!({"firstName": "Олена", "lastName": "Коваль", "licenseNumber": "CD654321"})),
    )
    .await;
    let (status, request) = call(
        app,
        Method::POST,
        "/api/requests",
        Some(token),
        Some(json!({"vehicleId": vehicle_id, "driverId": driver["id"], "from": "Base", "to": "Field"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    request["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_request_update_rejects_malformed_status() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;
    let request_uri = format!("/api/requests/{}", create_planned_request(&app, &admin).await);

    for status in [json!(123), json!(true), json!(" done "), json!("Done")] {
        let (code, body) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"status": status}))).await;
        assert_eq!(code, StatusCode::BAD_REQUEST, "status {}", status);
        assert_eq!(body["message"], "Invalid status");
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    let (_, requests) = call(&app, Method::GET, "/api/requests", Some(&admin), None).await;
    assert_eq!(requests[0]["status"], "planned");
}

#[tokio::test]
async fn test_request_update_accepts_depart_at_without_zone() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;
    let request_uri = format!("/api/requests/{}", create_planned_request(&app, &admin).await);

    let (status, body) = call(
        &app,
        Method::PUT,
        &request_uri,
        Some(&admin),
        Some(json!({"departAt": "2024-01-01 08:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["departAt"], "2024-01-01T08:00:00Z");

    let (status, body) = call(&app, Method::PUT, &request_uri, Some(&admin), Some(json!({"departAt": "someday"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid departAt");
}

#[tokio::test]
async fn test_request_creation_validates_references() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/requests",
        Some(&admin),
        Some(json!({"vehicleId": "ghost", "driverId": "ghost", "from": "A", "to": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid driver or vehicle");

    let (status, _) = call(&app, Method::POST, "/api/requests", Some(&admin), Some(json!({"from": "A"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_last_superadmin_survives() {
    let app = create_test_app().await;
    let chief = admin_token(&app).await;

    let (status, deputy) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(&chief),
        Some(json!({"email": "deputy@unit.ua", "password": "deputy1", "role": "superadmin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let deputy_id = deputy["id"].as_str().unwrap().to_string();

    let (_, me) = call(&app, Method::GET, "/api/me", Some(&chief), None).await;
    let chief_id = me["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, Method::DELETE, &format!("/api/users/{}", chief_id), Some(&chief), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot delete yourself");

    let (_, body) = login(&app, "deputy@unit.ua", "deputy1").await;
    let deputy_token = body["token"].as_str().unwrap().to_string();
    let (status, _) = call(&app, Method::DELETE, &format!("/api/users/{}", chief_id), Some(&deputy_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // el token del jefe sigue siendo válido aunque su cuenta ya no exista
    let (status, body) = call(&app, Method::DELETE, &format!("/api/users/{}", deputy_id), Some(&chief), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete the last superadmin");
}

#[tokio::test]
async fn test_profile_update_returns_fresh_token() {
    let app = create_test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = call(&app, Method::PUT, "/api/me", Some(&admin), Some(json!({"name": "Черговий"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Черговий");

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = call(&app, Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Черговий");
    assert!(me.get("passwordHash").is_none());
}
