//! Services module
//!
//! Lógica de negocio que no pertenece a un único recurso: autenticación
//! y pasadas de normalización al arrancar.

pub mod auth_service;
pub mod bootstrap;

pub use auth_service::AuthService;
pub use bootstrap::BootstrapReport;
