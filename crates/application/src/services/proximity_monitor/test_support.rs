//! In-memory live position source for monitor tests

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, LiveVehicle, VehicleType};
use parking_lot::Mutex;

use crate::error::ApplicationError;
use crate::ports::LivePositionPort;

/// Scripted live position feed
#[derive(Debug, Default)]
pub(crate) struct FakePositionSource {
    routes: HashMap<String, Result<Vec<LiveVehicle>, String>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, VehicleType)>>,
}

impl FakePositionSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_route(mut self, route: &str, vehicles: Vec<LiveVehicle>) -> Self {
        self.routes.insert(route.to_string(), Ok(vehicles));
        self
    }

    pub(crate) fn with_failing_route(mut self, route: &str, message: &str) -> Self {
        self.routes
            .insert(route.to_string(), Err(message.to_string()));
        self
    }

    pub(crate) fn with_delay(mut self, route: &str, delay: Duration) -> Self {
        self.delays.insert(route.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, VehicleType)> {
        self.calls.lock().clone()
    }

    pub(crate) fn routes_called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(r, _)| r.clone()).collect()
    }
}

#[async_trait]
impl LivePositionPort for FakePositionSource {
    async fn fetch_live_positions(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<Vec<LiveVehicle>, ApplicationError> {
        self.calls
            .lock()
            .push((route_code.to_string(), vehicle_type));

        if let Some(delay) = self.delays.get(route_code) {
            tokio::time::sleep(*delay).await;
        }

        match self.routes.get(route_code) {
            Some(Ok(vehicles)) => Ok(vehicles.clone()),
            Some(Err(message)) => Err(ApplicationError::ExternalService(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Anchor used across the monitor tests (Malé)
pub(crate) const ANCHOR: GeoLocation = GeoLocation::male();

/// About 11 m from [`ANCHOR`]
pub(crate) fn near_bus() -> LiveVehicle {
    LiveVehicle::new("BUS1", GeoLocation::new_unchecked(4.1755, 73.5094)).with_plate_number("P1")
}

/// About 5.3 km from [`ANCHOR`]
pub(crate) fn far_bus() -> LiveVehicle {
    LiveVehicle::new("BUS2", GeoLocation::new_unchecked(4.20, 73.55)).with_plate_number("P2")
}
