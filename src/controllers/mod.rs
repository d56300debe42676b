//! Controladores
//!
//! Un controlador por recurso. Reciben el almacén compartido, validan el
//! payload y delegan en los repositorios (o en el ciclo de despacho).

pub mod driver_controller;
pub mod request_controller;
pub mod trip_controller;
pub mod user_controller;
pub mod vehicle_controller;
