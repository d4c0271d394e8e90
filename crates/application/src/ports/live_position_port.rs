//! Live vehicle position port
//!
//! Defines the interface for reading the current positions of the vehicles
//! running on a route.

use async_trait::async_trait;
use domain::{LiveVehicle, VehicleType};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for live position lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LivePositionPort: Send + Sync {
    /// Fetch the vehicles currently reporting on a route
    ///
    /// # Arguments
    /// * `route_code` - Operator route code (e.g., "M1")
    /// * `vehicle_type` - Which live feed to query
    async fn fetch_live_positions(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<Vec<LiveVehicle>, ApplicationError>;
}
