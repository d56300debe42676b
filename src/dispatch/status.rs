use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de una solicitud de despacho
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    /// Estado inicial al crear la solicitud
    #[default]
    Planned,
    /// El vehículo ha salido
    InProgress,
    /// Salida completada
    Done,
    /// Salida cancelada
    Canceled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Planned,
        RequestStatus::InProgress,
        RequestStatus::Done,
        RequestStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}
