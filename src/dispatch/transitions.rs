//! Tabla de transiciones del despacho
//!
//! Cada par `(desde, hacia)` de `RequestStatus` tiene asociado como mucho un
//! efecto sobre el vehículo y el registro de viajes. Las guardas que dependen
//! del estado del vehículo se evalúan en tiempo de ejecución con
//! `DispatchEffect::permits`.

use super::status::RequestStatus;
use crate::models::Vehicle;

/// Efecto secundario de una transición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEffect {
    /// El vehículo pasa a `trip` y se registra la salida
    Depart,
    /// El vehículo vuelve a `base` y se registra el cierre
    Return,
}

impl DispatchEffect {
    /// Guarda dependiente del vehículo.
    ///
    /// `Depart` siempre procede (el vehículo puede no existir ya);
    /// `Return` solo si el vehículo sigue marcado en viaje.
    pub fn permits(&self, vehicle: Option<&Vehicle>) -> bool {
        match self {
            DispatchEffect::Depart => true,
            DispatchEffect::Return => vehicle.map_or(false, Vehicle::is_on_trip),
        }
    }
}

use DispatchEffect::{Depart, Return};
use RequestStatus::{Canceled, Done, InProgress, Planned};

/// Tabla completa `(desde, hacia) -> efecto`
pub const TRANSITION_TABLE: [(RequestStatus, RequestStatus, Option<DispatchEffect>); 16] = [
    (Planned, Planned, None),
    (Planned, InProgress, Some(Depart)),
    (Planned, Done, Some(Return)),
    (Planned, Canceled, Some(Return)),
    (InProgress, Planned, None),
    (InProgress, InProgress, None),
    (InProgress, Done, Some(Return)),
    (InProgress, Canceled, Some(Return)),
    (Done, Planned, None),
    (Done, InProgress, Some(Depart)),
    (Done, Done, Some(Return)),
    (Done, Canceled, Some(Return)),
    (Canceled, Planned, None),
    (Canceled, InProgress, Some(Depart)),
    (Canceled, Done, Some(Return)),
    (Canceled, Canceled, Some(Return)),
];

/// Cambio de estado solicitado sobre una solicitud
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTransition {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

impl DispatchTransition {
    pub fn new(from: RequestStatus, to: RequestStatus) -> Self {
        Self { from, to }
    }

    pub fn effect(&self) -> Option<DispatchEffect> {
        TRANSITION_TABLE
            .iter()
            .find(|(from, to, _)| *from == self.from && *to == self.to)
            .and_then(|(_, _, effect)| *effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleStatus;

    fn vehicle(status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: "v1".into(),
            make: "УАЗ".into(),
            model: "469".into(),
            vehicle_type: "позашляховик".into(),
            status,
            assigned_unit: "Штаб".into(),
            vin: None,
            registration_number: None,
            year: None,
            mileage: None,
            notes: None,
        }
    }

    #[test]
    fn test_table_covers_every_pair() {
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                let hits = TRANSITION_TABLE
                    .iter()
                    .filter(|(f, t, _)| *f == from && *t == to)
                    .count();
                assert_eq!(hits, 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_entering_in_progress_departs_once() {
        assert_eq!(DispatchTransition::new(Planned, InProgress).effect(), Some(Depart));
        assert_eq!(DispatchTransition::new(InProgress, InProgress).effect(), None);
    }

    #[test]
    fn test_terminal_targets_return() {
        for from in RequestStatus::ALL {
            assert_eq!(DispatchTransition::new(from, Done).effect(), Some(Return));
            assert_eq!(DispatchTransition::new(from, Canceled).effect(), Some(Return));
        }
    }

    #[test]
    fn test_back_to_planned_has_no_effect() {
        for from in RequestStatus::ALL {
            assert_eq!(DispatchTransition::new(from, Planned).effect(), None);
        }
    }

    #[test]
    fn test_return_guard_requires_vehicle_on_trip() {
        assert!(Return.permits(Some(&vehicle(VehicleStatus::Trip))));
        assert!(!Return.permits(Some(&vehicle(VehicleStatus::Base))));
        assert!(!Return.permits(Some(&vehicle(VehicleStatus::Repair))));
        assert!(!Return.permits(None));
        assert!(Depart.permits(None));
    }
}
