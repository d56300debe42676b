//! Modelos de datos
//!
//! Registros persistidos del parque: vehículos, usuarios, conductores,
//! viajes y solicitudes de despacho.

pub mod driver;
pub mod request;
pub mod timestamp;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use driver::{Driver, DriverSummary};
pub use request::{Request, RequestPatch};
pub use trip::Trip;
pub use user::{Role, User, UserResponse, UserStatus};
pub use vehicle::{Vehicle, VehicleStatus};
