//! Fechas de documentos persistidos
//!
//! Los datos históricos guardan algunas fechas como milisegundos Unix
//! (`1700000000000`) y otras como texto. Al escribir siempre se usa RFC3339.

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

use crate::utils::validation::parse_datetime;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
            RawTimestamp::Float(ms) if ms.is_finite() => Utc.timestamp_millis_opt(ms as i64).single(),
            RawTimestamp::Float(_) => None,
            RawTimestamp::Text(text) => match text.trim().parse::<i64>() {
                Ok(ms) => Utc.timestamp_millis_opt(ms).single(),
                Err(_) => parse_datetime(&text),
            },
        }
    }
}

/// Fecha obligatoria: milisegundos o texto
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?
        .into_datetime()
        .ok_or_else(|| de::Error::custom("invalid timestamp"))
}

/// Fecha opcional: `null` o un valor irreconocible quedan en `None`
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(RawTimestamp::into_datetime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "deserialize")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "deserialize_option")]
        seen: Option<DateTime<Utc>>,
    }

    fn stamped(value: serde_json::Value) -> Stamped {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reads_epoch_millis() {
        let doc = stamped(json!({"at": 1700000000000i64, "seen": 1700000000000.0}));
        assert_eq!(doc.at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert_eq!(doc.seen, Some(doc.at));
    }

    #[test]
    fn test_reads_text_forms() {
        assert_eq!(stamped(json!({"at": "2024-01-01T08:00:00Z"})).at.to_rfc3339(), "2024-01-01T08:00:00+00:00");
        assert_eq!(stamped(json!({"at": "2024-01-01 08:00"})).at.to_rfc3339(), "2024-01-01T08:00:00+00:00");
        assert_eq!(stamped(json!({"at": "1700000000000"})).at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_optional_is_lenient() {
        assert_eq!(stamped(json!({"at": 0})).seen, None);
        assert_eq!(stamped(json!({"at": 0, "seen": null})).seen, None);
        assert_eq!(stamped(json!({"at": 0, "seen": "ayer"})).seen, None);
        assert!(serde_json::from_value::<Stamped>(json!({"at": "ayer"})).is_err());
    }
}
