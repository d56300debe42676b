//! Normalización de flechas en las notas de viajes
//!
//! Los datos históricos contienen un carácter de control seguido de `2`
//! donde debería ir una flecha. También se unifica la flecha ASCII `->`.

use lazy_static::lazy_static;
use regex::Regex;

use super::status::RequestStatus;
use crate::models::Request;

pub const ARROW: &str = " → ";

lazy_static! {
    static ref CONTROL_ARROW: Regex = Regex::new(r"[\x00-\x1F]2").unwrap();
    static ref ASCII_ARROW: Regex = Regex::new(r"\s->\s").unwrap();
}

/// Sustituye flechas corruptas o ASCII por `→`
pub fn sanitize_arrows(text: &str) -> String {
    let text = CONTROL_ARROW.replace_all(text, ARROW);
    ASCII_ARROW.replace_all(&text, ARROW).into_owned()
}

/// Nota del viaje sintético de salida
pub fn departure_note(request: &Request) -> String {
    sanitize_arrows(&format!(
        "[dispatch] старт: {} -> {} (request #{})",
        request.from, request.to, request.id
    ))
}

/// Nota del viaje sintético de cierre
pub fn return_note(request: &Request, status: RequestStatus) -> String {
    sanitize_arrows(&format!(
        "[dispatch] завершено: {} -> {} ({}) (request #{})",
        request.from, request.to, status, request.id
    ))
}
