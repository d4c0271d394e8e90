//! Background poll loop
//!
//! One cycle walks the registry snapshot in registration order and each
//! watch's routes in list order, fetching live positions and dispatching a
//! [`ProximityEvent`] for every vehicle inside the watch's threshold.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use domain::{LiveVehicle, VehicleType};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::config::PollTimings;
use super::error::MonitorError;
use super::registry::{RegisteredWatch, WatchRegistry};
use super::stats::MonitorStats;
use super::watch::ProximityEvent;
use crate::ports::LivePositionPort;

/// Lifecycle of the poller task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Not started yet
    Idle,
    /// Cycling
    Running,
    /// Cancelled; terminal
    Stopped,
}

impl fmt::Display for PollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Outcome of a single poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Watches in the snapshot
    pub watches: usize,
    /// Fetches that resolved, successfully or not
    ///
    /// A fetch abandoned on cancellation is not counted.
    pub fetches: usize,
    /// Fetches that failed or timed out
    pub fetch_failures: usize,
    /// Events dispatched to callbacks
    pub events: usize,
    /// Callbacks that returned an error or panicked
    pub callback_failures: usize,
}

/// Polls live positions for every registered watch
pub struct ProximityPoller {
    registry: Arc<WatchRegistry>,
    source: Arc<dyn LivePositionPort>,
    timings: PollTimings,
    stats: Arc<MonitorStats>,
}

impl fmt::Debug for ProximityPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityPoller")
            .field("watches", &self.registry.len())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl ProximityPoller {
    /// Create a poller over a shared registry
    #[must_use]
    pub fn new(
        registry: Arc<WatchRegistry>,
        source: Arc<dyn LivePositionPort>,
        timings: PollTimings,
        stats: Arc<MonitorStats>,
    ) -> Self {
        Self {
            registry,
            source,
            timings,
            stats,
        }
    }

    /// Cycle until cancelled, sleeping `poll_interval` between cycles
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_ms = self.timings.poll_interval.as_millis(),
            fetch_timeout_ms = self.timings.fetch_timeout.as_millis(),
            "Proximity poller started"
        );

        while !cancel.is_cancelled() {
            let report = self.run_cycle(&cancel).await;
            debug!(
                watches = report.watches,
                fetches = report.fetches,
                fetch_failures = report.fetch_failures,
                events = report.events,
                callback_failures = report.callback_failures,
                "Proximity poll cycle finished"
            );

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.timings.poll_interval) => {},
            }
        }

        info!("Proximity poller stopped");
    }

    /// Run one pass over the current registry snapshot
    ///
    /// Returns early, without dispatching further events, once `cancel`
    /// fires.
    #[instrument(skip_all)]
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleReport {
        let watches = self.registry.snapshot();
        let mut report = CycleReport {
            watches: watches.len(),
            ..CycleReport::default()
        };

        'watches: for entry in &watches {
            for route_code in &entry.watch.routes {
                if cancel.is_cancelled() {
                    break 'watches;
                }

                let Some(outcome) = self
                    .fetch(route_code, entry.watch.vehicle_type, cancel)
                    .await
                    .transpose()
                else {
                    break 'watches;
                };

                report.fetches += 1;
                let vehicles = match outcome {
                    Ok(vehicles) => vehicles,
                    Err(e) => {
                        warn!(watch_id = %entry.id, error = %e, "Skipping route for this cycle");
                        report.fetch_failures += 1;
                        continue;
                    },
                };

                self.evaluate(entry, route_code, vehicles, &mut report);
            }
        }

        self.stats.record_cycle(&report);
        report
    }

    /// Fetch one route, bounded by the fetch timeout
    ///
    /// `Ok(None)` means the fetch was abandoned because of cancellation.
    async fn fetch(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<LiveVehicle>>, MonitorError> {
        let timeout = self.timings.fetch_timeout;
        let request = tokio::time::timeout(
            timeout,
            self.source.fetch_live_positions(route_code, vehicle_type),
        );

        tokio::select! {
            () = cancel.cancelled() => Ok(None),
            result = request => match result {
                Ok(Ok(vehicles)) => Ok(Some(vehicles)),
                Ok(Err(e)) => Err(MonitorError::Network {
                    route_code: route_code.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(MonitorError::FetchTimeout {
                    route_code: route_code.to_string(),
                    timeout,
                }),
            },
        }
    }

    fn evaluate(
        &self,
        entry: &RegisteredWatch,
        route_code: &str,
        vehicles: Vec<LiveVehicle>,
        report: &mut CycleReport,
    ) {
        for vehicle in vehicles {
            let Some(distance_km) = entry.watch.proximity_of(&vehicle) else {
                continue;
            };

            debug!(
                watch_id = %entry.id,
                vehicle_id = %vehicle.vehicle_id,
                route_code,
                distance_km,
                "Vehicle within threshold"
            );

            let event = ProximityEvent::new(
                entry.id,
                Arc::clone(&entry.watch),
                route_code,
                vehicle,
                distance_km,
            );
            report.events += 1;

            if let Err(e) = dispatch(&event) {
                warn!(
                    watch_id = %entry.id,
                    vehicle_id = %event.vehicle_id,
                    error = %e,
                    "Proximity callback failed"
                );
                report.callback_failures += 1;
            }
        }
    }
}

/// Invoke the watch callback, converting errors and panics
fn dispatch(event: &ProximityEvent) -> Result<(), MonitorError> {
    let callback = &event.watch.callback;
    match catch_unwind(AssertUnwindSafe(|| callback(event))) {
        Ok(result) => result.map_err(MonitorError::Callback),
        Err(payload) => Err(MonitorError::Callback(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("callback panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("callback panicked: {message}")
    } else {
        "callback panicked".to_string()
    }
}
