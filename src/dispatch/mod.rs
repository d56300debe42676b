//! Gestor del ciclo de despacho
//!
//! Acopla los cambios de estado de una solicitud con el estado del
//! vehículo y el registro de viajes.

pub mod lifecycle;
pub mod sanitize;
pub mod status;
pub mod transitions;

pub use lifecycle::{DispatchLifecycle, EffectOutcome};
pub use sanitize::sanitize_arrows;
pub use status::RequestStatus;
pub use transitions::{DispatchEffect, DispatchTransition};
