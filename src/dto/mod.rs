//! Data Transfer Objects
//!
//! Payloads de entrada y salida de la API. Los campos obligatorios se
//! declaran como `Option` para responder 400 con un mensaje propio en
//! lugar del rechazo genérico del extractor `Json`.

pub mod auth_dto;
pub mod driver_dto;
pub mod request_dto;
pub mod trip_dto;
pub mod user_dto;
pub mod vehicle_dto;
