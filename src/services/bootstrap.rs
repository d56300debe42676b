//! Pasadas de normalización al arrancar
//!
//! Se ejecutan en orden una vez, antes de aceptar peticiones. Cada pasada
//! solo reescribe su colección si algo cambió. Usuarios y viajes se
//! tratan como documentos crudos para no perder campos desconocidos.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::dispatch::sanitize_arrows;
use crate::models::{Role, User, Vehicle};
use crate::repositories::{Collection, DocumentStore, UserRepository, VehicleRepository};
use crate::services::auth_service::hash_password;
use crate::utils::errors::AppResult;

/// Qué hizo cada pasada
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BootstrapReport {
    pub superadmin_promoted: bool,
    pub superadmin_seeded: bool,
    pub users_merged: usize,
    pub statuses_defaulted: usize,
    pub trip_notes_cleaned: usize,
    pub vehicles_seeded: usize,
}

pub async fn run(store: Arc<dyn DocumentStore>, config: &EnvironmentConfig) -> AppResult<BootstrapReport> {
    let mut report = BootstrapReport::default();

    if config.seed_superadmin {
        ensure_superadmin(store.clone(), config, &mut report).await?;
    }
    report.users_merged = dedupe_users(store.as_ref()).await?;
    report.statuses_defaulted = default_user_status(store.as_ref()).await?;
    report.trip_notes_cleaned = clean_trip_notes(store.as_ref()).await?;
    if config.seed_vehicles {
        report.vehicles_seeded = seed_vehicles(store).await?;
    }

    Ok(report)
}

/// Garantiza que exista al menos un superadmin
async fn ensure_superadmin(
    store: Arc<dyn DocumentStore>,
    config: &EnvironmentConfig,
    report: &mut BootstrapReport,
) -> AppResult<()> {
    // documentos crudos: un superadmin con campos ilegibles sigue contando
    let has_superadmin = store
        .list(Collection::Users)
        .await?
        .iter()
        .any(|u| role_rank(u) == Role::SuperAdmin.rank());
    if has_superadmin {
        return Ok(());
    }

    let users = UserRepository::new(store);

    if let Some(mut existing) = users.find_by_email(&config.superadmin_email).await? {
        existing.role = Role::SuperAdmin;
        users.upsert(&existing).await?;
        warn!("⚠️ Usuario {} promovido a superadmin", existing.email);
        report.superadmin_promoted = true;
        return Ok(());
    }

    let admin = User {
        id: Uuid::new_v4().to_string(),
        email: config.superadmin_email.clone(),
        name: "Адміністратор".to_string(),
        role: Role::SuperAdmin,
        position: None,
        status: None,
        password_hash: hash_password(&config.superadmin_password, config.bcrypt_cost)?,
        phone: None,
        created_at: None,
    };
    users.upsert(&admin).await?;
    warn!("⚠️ Superadmin por defecto creado: {} (cambie la contraseña)", admin.email);
    report.superadmin_seeded = true;
    Ok(())
}

fn role_rank(user: &Value) -> u8 {
    user.get("role")
        .and_then(Value::as_str)
        .and_then(|r| r.parse::<Role>().ok())
        .map(|r| r.rank())
        .unwrap_or(0)
}

/// Emails en minúsculas y una sola cuenta por email: gana el rol más
/// alto, y a igualdad la primera
async fn dedupe_users(store: &dyn DocumentStore) -> AppResult<usize> {
    let users = store.list(Collection::Users).await?;
    let original_len = users.len();
    let mut changed = false;
    let mut order: Vec<String> = Vec::new();
    let mut kept: HashMap<String, Value> = HashMap::new();

    for mut user in users {
        let raw = user.get("email").and_then(Value::as_str).unwrap_or_default().to_string();
        let email = raw.to_lowercase();
        if email != raw {
            user["email"] = json!(&email);
            changed = true;
        }

        let keep_existing = kept
            .get(&email)
            .map(|existing| role_rank(existing) >= role_rank(&user));
        match keep_existing {
            None => {
                order.push(email.clone());
                kept.insert(email, user);
            }
            Some(true) => {}
            Some(false) => {
                kept.insert(email, user);
            }
        }
    }

    let merged = original_len - order.len();
    if changed || merged > 0 {
        let documents = order.iter().filter_map(|email| kept.remove(email)).collect();
        store.replace_collection(Collection::Users, documents).await?;
        info!("👥 Usuarios normalizados: emails en minúsculas, {} duplicados fusionados", merged);
    }
    Ok(merged)
}

/// Usuarios sin estado pasan a `active`
async fn default_user_status(store: &dyn DocumentStore) -> AppResult<usize> {
    let mut users = store.list(Collection::Users).await?;
    let mut defaulted = 0;
    for user in users.iter_mut() {
        let missing = user.get("status").map_or(true, |s| s.is_null() || s.as_str() == Some(""));
        if missing {
            if let Some(object) = user.as_object_mut() {
                object.insert("status".to_string(), json!("active"));
                defaulted += 1;
            }
        }
    }
    if defaulted > 0 {
        store.replace_collection(Collection::Users, users).await?;
        info!("👥 {} usuarios sin estado marcados como activos", defaulted);
    }
    Ok(defaulted)
}

async fn clean_trip_notes(store: &dyn DocumentStore) -> AppResult<usize> {
    let mut trips = store.list(Collection::Trips).await?;
    let mut cleaned = 0;
    for trip in trips.iter_mut() {
        let notes = trip.get("notes").and_then(Value::as_str).unwrap_or_default();
        let sanitized = sanitize_arrows(notes);
        if sanitized != notes {
            trip["notes"] = json!(sanitized);
            cleaned += 1;
        }
    }
    if cleaned > 0 {
        store.replace_collection(Collection::Trips, trips).await?;
        info!("🧹 Flechas corregidas en {} notas de viaje", cleaned);
    }
    Ok(cleaned)
}

fn sample_vehicles() -> Vec<Value> {
    vec![
        json!({
            "make": "КрАЗ", "model": "6322", "type": "вантажівка",
            "assignedUnit": "Рота забезпечення", "vin": "KRAZ-6322-0001",
            "registrationNumber": "ВЧ-1234", "year": 2018, "mileage": 32500.0
        }),
        json!({
            "make": "ЗІЛ", "model": "131", "type": "вантажівка",
            "assignedUnit": "Рота забезпечення", "vin": "ZIL-131-0002",
            "registrationNumber": "ВЧ-2234", "year": 1990, "mileage": 120000.0
        }),
        json!({
            "make": "УАЗ", "model": "469", "type": "позашляховик",
            "assignedUnit": "Штаб", "vin": "UAZ-469-0003",
            "registrationNumber": "ВЧ-3234", "year": 1985, "mileage": 80000.0
        }),
    ]
}

/// Vehículos de ejemplo cuando el parque está vacío
async fn seed_vehicles(store: Arc<dyn DocumentStore>) -> AppResult<usize> {
    let vehicles = VehicleRepository::new(store);
    if !vehicles.list().await?.is_empty() {
        return Ok(0);
    }

    let mut seeded = 0;
    for mut sample in sample_vehicles() {
        sample["id"] = json!(Uuid::new_v4().to_string());
        sample["status"] = json!("base");
        sample["notes"] = json!("");
        let vehicle: Vehicle = serde_json::from_value(sample)?;
        vehicles.upsert(&vehicle).await?;
        seeded += 1;
    }
    info!("🚚 {} vehículos de ejemplo creados", seeded);
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MemoryStore, Snapshot};

    fn config() -> EnvironmentConfig {
        EnvironmentConfig {
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        }
    }

    #[tokio::test]
    async fn test_dedupe_keeps_higher_role() {
        let snapshot = Snapshot {
            users: vec![
                json!({"id": "1", "email": "Ivan@Unit.UA", "role": "user"}),
                json!({"id": "2", "email": "ivan@unit.ua", "role": "admin"}),
                json!({"id": "3", "email": "olena@unit.ua", "role": "admin"}),
                json!({"id": "4", "email": "OLENA@unit.ua", "role": "admin"}),
            ],
            ..Snapshot::default()
        };
        let store = MemoryStore::with_snapshot(snapshot);

        assert_eq!(dedupe_users(&store).await.unwrap(), 2);
        let users = store.list(Collection::Users).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["id"], "2");
        assert_eq!(users[1]["id"], "3");
        assert!(users.iter().all(|u| u["email"].as_str().unwrap().chars().all(|c| !c.is_uppercase())));
    }

    #[tokio::test]
    async fn test_default_status_only_when_missing() {
        let snapshot = Snapshot {
            users: vec![
                json!({"id": "1", "email": "a@unit.ua"}),
                json!({"id": "2", "email": "b@unit.ua", "status": "pending"}),
            ],
            ..Snapshot::default()
        };
        let store = MemoryStore::with_snapshot(snapshot);

        assert_eq!(default_user_status(&store).await.unwrap(), 1);
        let users = store.list(Collection::Users).await.unwrap();
        assert_eq!(users[0]["status"], "active");
        assert_eq!(users[1]["status"], "pending");
    }

    #[tokio::test]
    async fn test_full_run_on_empty_store() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let report = run(store.clone(), &config()).await.unwrap();

        assert!(report.superadmin_seeded);
        assert_eq!(report.vehicles_seeded, 3);
        let users = UserRepository::new(store.clone()).list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].status, Some(crate::models::UserStatus::Active));

        // una segunda pasada no cambia nada
        let again = run(store, &config()).await.unwrap();
        assert_eq!(again, BootstrapReport::default());
    }

    #[tokio::test]
    async fn test_promotes_existing_admin_email() {
        let snapshot = Snapshot {
            users: vec![json!({"id": "7", "email": "admin@local", "role": "admin", "status": "active"})],
            ..Snapshot::default()
        };
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::with_snapshot(snapshot));
        let report = run(store.clone(), &config()).await.unwrap();

        assert!(report.superadmin_promoted);
        let admin = UserRepository::new(store).get("7").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_keeps_legacy_superadmin_with_numeric_created_at() {
        use crate::dto::auth_dto::LoginRequest;
        use crate::services::auth_service::AuthService;
        use crate::utils::jwt::{JwtConfig, JwtService};

        let snapshot = Snapshot {
            users: vec![json!({
                "id": "1700000000000",
                "email": "admin@local",
                "role": "superadmin",
                "status": "active",
                "passwordHash": hash_password("admin123", 4).unwrap(),
                "createdAt": 1700000000000i64
            })],
            ..Snapshot::default()
        };
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::with_snapshot(snapshot));
        let report = run(store.clone(), &config()).await.unwrap();

        assert!(!report.superadmin_seeded);
        assert_eq!(report.users_merged, 0);
        let users = UserRepository::new(store.clone()).list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "1700000000000");

        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }));
        let auth = AuthService::new(store, jwt, 4);
        let response = auth
            .login(LoginRequest {
                email: "admin@local".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_trip_notes_are_sanitized() {
        let snapshot = Snapshot {
            trips: vec![json!({
                "id": "t1", "driverId": "d1", "vehicleId": "v1",
                "date": "2024-05-01T08:00:00Z", "distanceKm": 0.0,
                "notes": "Київ\u{0012}2Житомир"
            })],
            ..Snapshot::default()
        };
        let store = MemoryStore::with_snapshot(snapshot);

        assert_eq!(clean_trip_notes(&store).await.unwrap(), 1);
        let trips = store.list(Collection::Trips).await.unwrap();
        assert_eq!(trips[0]["notes"], "Київ → Житомир");
    }
}
