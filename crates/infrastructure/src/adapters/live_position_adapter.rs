//! Live position adapter - Implements LivePositionPort using integration_rtl

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::LivePositionPort;
use async_trait::async_trait;
use domain::{LiveVehicle, VehicleType};
use integration_rtl::{RtlClient, RtlError};
use tracing::{debug, info, instrument};

/// Adapter reading live vehicle positions from the RTL backend
///
/// A missing token is restored through `login_if_expired`. A token the server
/// rejected forces a fresh login, since the cached copy may still look valid.
/// Either way the request is retried once.
pub struct LivePositionAdapter {
    client: Arc<dyn RtlClient>,
}

impl std::fmt::Debug for LivePositionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivePositionAdapter")
            .field("client", &"RtlClient")
            .finish()
    }
}

impl LivePositionAdapter {
    /// Create a new adapter over a shared client
    pub fn new(client: Arc<dyn RtlClient>) -> Self {
        Self { client }
    }

    async fn fetch(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<Vec<LiveVehicle>, RtlError> {
        let live = self.client.live_coordinates(route_code, vehicle_type).await?;
        Ok(live.into_vehicles())
    }
}

/// Map a client error onto the application error taxonomy
fn map_error(err: RtlError) -> ApplicationError {
    match err {
        RtlError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
        RtlError::Timeout { timeout_secs } => ApplicationError::Timeout(timeout_secs),
        RtlError::NotAuthenticated | RtlError::AuthenticationFailed(_) => {
            ApplicationError::NotAuthorized(err.to_string())
        },
        RtlError::ConfigurationError(message) => ApplicationError::Configuration(message),
        other => ApplicationError::ExternalService(format!("RTL live coordinates: {other}")),
    }
}

const fn is_auth_error(err: &RtlError) -> bool {
    matches!(
        err,
        RtlError::NotAuthenticated | RtlError::AuthenticationFailed(_)
    )
}

impl LivePositionAdapter {
    /// Obtain a usable token after an auth failure
    async fn reauthenticate(&self, err: &RtlError) -> Result<(), RtlError> {
        if matches!(err, RtlError::NotAuthenticated) {
            self.client.login_if_expired().await
        } else {
            self.client.refresh_login().await
        }
    }
}

#[async_trait]
impl LivePositionPort for LivePositionAdapter {
    #[instrument(skip(self))]
    async fn fetch_live_positions(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<Vec<LiveVehicle>, ApplicationError> {
        let vehicles = match self.fetch(route_code, vehicle_type).await {
            Err(e) if is_auth_error(&e) => {
                info!(error = %e, "Live coordinates rejected the token, refreshing");
                self.reauthenticate(&e).await.map_err(map_error)?;
                self.fetch(route_code, vehicle_type).await
            },
            result => result,
        }
        .map_err(map_error)?;

        debug!(count = vehicles.len(), "Live vehicles received");
        Ok(vehicles)
    }
}
