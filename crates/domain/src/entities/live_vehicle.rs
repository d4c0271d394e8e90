//! Live vehicle position as reported by the operator's tracking feed

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// A vehicle currently reporting its position on a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveVehicle {
    /// Operator vehicle code (e.g., "BUS1")
    pub vehicle_id: String,
    /// Registration plate, when the feed provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,
    /// Last reported position
    pub location: GeoLocation,
}

impl LiveVehicle {
    /// Create a live vehicle without a plate number
    #[must_use]
    pub fn new(vehicle_id: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            plate_number: None,
            location,
        }
    }

    /// Attach a plate number
    #[must_use]
    pub fn with_plate_number(mut self, plate_number: impl Into<String>) -> Self {
        self.plate_number = Some(plate_number.into());
        self
    }

    /// Distance from this vehicle to a location in kilometers
    #[must_use]
    pub fn distance_to_km(&self, location: &GeoLocation) -> f64 {
        self.location.distance_km(location)
    }
}
