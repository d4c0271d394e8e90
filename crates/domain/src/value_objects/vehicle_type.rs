//! Vehicle type - Selects the live-position feed and route namespace

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vehicle classes served by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    /// Road bus
    #[default]
    Bus,
    /// Ferry / speed launch
    Vessel,
}

impl VehicleType {
    /// Get the display name for this vehicle type
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::Vessel => "Vessel",
        }
    }

    /// Path segment used by the booking API (`/booking/v1/{segment}/...`)
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Vessel => "vessel",
        }
    }

    /// Parse from a config or CLI string (case-insensitive)
    #[must_use]
    pub fn from_config(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bus" => Some(Self::Bus),
            "vessel" | "ferry" => Some(Self::Vessel),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for VehicleType {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config(s)
            .ok_or_else(|| crate::DomainError::InvalidVehicleType(s.to_string()))
    }
}
