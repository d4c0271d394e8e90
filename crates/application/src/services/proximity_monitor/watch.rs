//! Watch definitions and proximity events

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{GeoLocation, LiveVehicle, VehicleType};

/// Default proximity threshold in kilometers
///
/// 35 meters is a tight radius for a moving vehicle polled every few
/// seconds; watches usually override it.
pub const DEFAULT_THRESHOLD_KM: f64 = 0.035;

/// Callback invoked for every vehicle found within a watch's threshold
///
/// Runs synchronously on the poller task. An `Err` is logged and counted;
/// it never stops the poller.
pub type ProximityCallback = Arc<dyn Fn(&ProximityEvent) -> Result<(), String> + Send + Sync>;

/// Identifier handed out by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub(crate) u64);

impl WatchId {
    /// Numeric value of the identifier
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// A registered interest in vehicles approaching a location
#[derive(Clone)]
pub struct WatchParameter {
    /// Location vehicles are measured against
    pub anchor: GeoLocation,
    /// Inclusive distance threshold in kilometers
    ///
    /// `None` takes the monitor's configured default when the watch is
    /// registered.
    pub threshold_km: Option<f64>,
    /// Restrict matching to these vehicle ids; `None` matches every vehicle
    pub vehicle_filter: Option<HashSet<String>>,
    /// Route codes to poll, in order
    pub routes: Vec<String>,
    /// Live feed to poll the routes on
    pub vehicle_type: VehicleType,
    /// Invoked once per matching vehicle per cycle
    pub callback: ProximityCallback,
}

impl WatchParameter {
    /// Create a watch with no explicit threshold and no vehicle filter
    pub fn new<R, F>(
        anchor: GeoLocation,
        routes: impl IntoIterator<Item = R>,
        vehicle_type: VehicleType,
        callback: F,
    ) -> Self
    where
        R: Into<String>,
        F: Fn(&ProximityEvent) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            anchor,
            threshold_km: None,
            vehicle_filter: None,
            routes: routes.into_iter().map(Into::into).collect(),
            vehicle_type,
            callback: Arc::new(callback),
        }
    }

    /// Override the distance threshold
    #[must_use]
    pub fn with_threshold_km(mut self, threshold_km: f64) -> Self {
        self.threshold_km = Some(threshold_km);
        self
    }

    /// Only match the given vehicle ids
    #[must_use]
    pub fn with_vehicle_filter<S: Into<String>>(
        mut self,
        vehicle_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        self.vehicle_filter = Some(vehicle_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a vehicle passes the vehicle filter
    #[must_use]
    pub fn accepts_vehicle(&self, vehicle_id: &str) -> bool {
        self.vehicle_filter
            .as_ref()
            .is_none_or(|ids| ids.contains(vehicle_id))
    }

    /// Threshold in force, falling back to [`DEFAULT_THRESHOLD_KM`]
    #[must_use]
    pub fn effective_threshold_km(&self) -> f64 {
        self.threshold_km.unwrap_or(DEFAULT_THRESHOLD_KM)
    }

    /// Distance from the anchor if the vehicle is within the threshold
    #[must_use]
    pub fn proximity_of(&self, vehicle: &LiveVehicle) -> Option<f64> {
        if !self.accepts_vehicle(&vehicle.vehicle_id) {
            return None;
        }
        let distance = self.anchor.distance_km(&vehicle.location);
        (distance <= self.effective_threshold_km()).then_some(distance)
    }
}

impl fmt::Debug for WatchParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchParameter")
            .field("anchor", &self.anchor)
            .field("threshold_km", &self.threshold_km)
            .field("vehicle_filter", &self.vehicle_filter)
            .field("routes", &self.routes)
            .field("vehicle_type", &self.vehicle_type)
            .finish_non_exhaustive()
    }
}

/// A vehicle detected within a watch's threshold
#[derive(Debug, Clone)]
pub struct ProximityEvent {
    /// Watch that matched
    pub watch_id: WatchId,
    /// Operator vehicle code
    pub vehicle_id: String,
    /// Registration plate, when reported
    pub plate_number: Option<String>,
    /// Vehicle position at detection time
    pub location: GeoLocation,
    /// Distance to the watch anchor in kilometers
    pub distance_km: f64,
    /// Route the vehicle was reported on
    pub route_code: String,
    /// When the match was computed
    pub detected_at: DateTime<Utc>,
    /// The watch that matched, including its callback
    pub watch: Arc<WatchParameter>,
}

impl ProximityEvent {
    pub(crate) fn new(
        watch_id: WatchId,
        watch: Arc<WatchParameter>,
        route_code: &str,
        vehicle: LiveVehicle,
        distance_km: f64,
    ) -> Self {
        Self {
            watch_id,
            vehicle_id: vehicle.vehicle_id,
            plate_number: vehicle.plate_number,
            location: vehicle.location,
            distance_km,
            route_code: route_code.to_string(),
            detected_at: Utc::now(),
            watch,
        }
    }
}
