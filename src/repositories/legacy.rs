//! Migración del formato antiguo de `db.json`
//!
//! Las primeras versiones guardaban un arreglo `equipment` en lugar de
//! `vehicles`. Al cargar se convierte al formato actual.

use serde_json::{json, Map, Value};

use super::store::Snapshot;

fn text(item: &Map<String, Value>, key: &str) -> Value {
    match item.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Value::String(s.clone()),
        _ => Value::String(String::new()),
    }
}

fn equipment_to_vehicle(item: &Map<String, Value>, fallback_id: String) -> Value {
    let status = match item.get("status").and_then(Value::as_str) {
        Some("repair") => "repair",
        _ => "base",
    };
    let id = match item.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Value::String(id.clone()),
        Some(Value::Number(id)) => Value::String(id.to_string()),
        _ => Value::String(fallback_id),
    };

    let mut vehicle = json!({
        "id": id,
        "make": text(item, "make"),
        "model": text(item, "name"),
        "type": text(item, "category"),
        "status": status,
        "assignedUnit": text(item, "owner"),
        "vin": text(item, "serial"),
        "registrationNumber": text(item, "registrationNumber"),
        "mileage": item.get("mileage").and_then(Value::as_f64).unwrap_or(0.0),
        "notes": text(item, "notes"),
    });
    if let Some(year) = item.get("year").and_then(Value::as_i64) {
        vehicle["year"] = json!(year);
    }
    vehicle
}

/// Convierte el contenido crudo del fichero en un `Snapshot`
pub fn migrate(raw: Value) -> Result<Snapshot, serde_json::Error> {
    let has_vehicles = raw.get("vehicles").map_or(false, Value::is_array);
    let equipment = raw
        .get("equipment")
        .and_then(Value::as_array)
        .cloned()
        .filter(|_| !has_vehicles);

    let mut snapshot: Snapshot = serde_json::from_value(raw)?;
    if let Some(equipment) = equipment {
        snapshot.vehicles = equipment
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.as_object()
                    .map(|obj| equipment_to_vehicle(obj, format!("legacy-{}", index)))
            })
            .collect();
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Vehicle, VehicleStatus};

    #[test]
    fn test_equipment_becomes_vehicles() {
        let raw = json!({
            "equipment": [
                {"id": "e1", "make": "ЗІЛ", "name": "131", "category": "вантажівка", "status": "repair", "owner": "Рота"},
                {"id": 42, "make": "УАЗ", "name": "469", "status": "available", "year": 1985}
            ],
            "users": [{"id": "u1", "email": "admin@local"}]
        });

        let snapshot = migrate(raw).unwrap();
        assert_eq!(snapshot.vehicles.len(), 2);
        assert_eq!(snapshot.users.len(), 1);

        let first: Vehicle = serde_json::from_value(snapshot.vehicles[0].clone()).unwrap();
        assert_eq!(first.model, "131");
        assert_eq!(first.status, VehicleStatus::Repair);
        assert_eq!(first.assigned_unit, "Рота");

        let second: Vehicle = serde_json::from_value(snapshot.vehicles[1].clone()).unwrap();
        assert_eq!(second.id, "42");
        assert_eq!(second.status, VehicleStatus::Base);
        assert_eq!(second.year, Some(1985));
    }

    #[test]
    fn test_current_format_untouched() {
        let raw = json!({"vehicles": [{"id": "v1"}], "equipment": [{"id": "e1"}]});
        let snapshot = migrate(raw).unwrap();
        assert_eq!(snapshot.vehicles, vec![json!({"id": "v1"})]);
    }
}
