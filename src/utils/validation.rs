//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use validator::ValidationError;

use crate::utils::errors::{bad_request_error, AppError};

/// Formatos sin zona horaria que se aceptan como UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Interpretar una fecha: RFC3339, fecha y hora sin zona (UTC) o solo fecha
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_datetime(value).ok_or_else(|| {
        let mut error = ValidationError::new("datetime");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"RFC3339".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Exigir que todos los campos estén presentes y no vacíos.
///
/// Devuelve un `BadRequest` con el mensaje indicado si alguno falta.
pub fn require_fields(fields: &[Option<&str>], message: &str) -> Result<(), AppError> {
    let missing = fields
        .iter()
        .any(|field| field.map_or(true, |v| validate_not_empty(v).is_err()));
    if missing {
        return Err(bad_request_error(message));
    }
    Ok(())
}

/// Parsear un timestamp del payload, `BadRequest` si no se reconoce el formato
pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    validate_datetime(value).map_err(|_| bad_request_error(&format!("Invalid {}", field)))
}

/// Normalizar un email: recortar y pasar a minúsculas
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_datetime() {
        assert!(validate_datetime("2024-01-01T08:00:00Z").is_ok());
        assert!(validate_datetime("2024-01-01T08:00:00+02:00").is_ok());
        assert!(validate_datetime("2024/01/01 08:00").is_err());
        assert!(validate_datetime("mañana").is_err());
    }

    #[test]
    fn test_parse_datetime_without_zone_is_utc() {
        let expected = "2024-01-01T08:00:00+00:00";
        assert_eq!(parse_datetime("2024-01-01 08:00").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_datetime("2024-01-01T08:00").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_datetime("2024-01-01 08:00:00").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_datetime("2024-01-01").unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(12.5).is_ok());
        assert!(validate_positive(0.0).is_err());
        assert!(validate_positive(-3.0).is_err());
        assert!(validate_positive(f64::NAN).is_err());
    }

    #[test]
    fn test_require_fields() {
        assert!(require_fields(&[Some("a"), Some("b")], "missing").is_ok());
        assert!(require_fields(&[Some("a"), None], "missing").is_err());
        assert!(require_fields(&[Some("  ")], "missing").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Local "), "admin@local");
    }
}
