//! Monitor facade owning the registry and the single poller task

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::{MonitorConfig, PollTimings};
use super::error::MonitorError;
use super::poller::{PollerState, ProximityPoller};
use super::registry::WatchRegistry;
use super::stats::{MonitorStats, MonitorStatsSnapshot};
use super::watch::{DEFAULT_THRESHOLD_KM, WatchId, WatchParameter};
use crate::ports::LivePositionPort;

enum SupervisorState {
    Idle,
    Running {
        cancel: CancellationToken,
        handle: JoinHandle<()>,
    },
    Stopped,
}

impl SupervisorState {
    const fn poller_state(&self) -> PollerState {
        match self {
            Self::Idle => PollerState::Idle,
            Self::Running { .. } => PollerState::Running,
            Self::Stopped => PollerState::Stopped,
        }
    }
}

/// Proximity monitor
///
/// Registration is non-blocking and lazily starts exactly one background
/// poller on the current Tokio runtime. The monitor can be shared across
/// tasks behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// let monitor = ProximityMonitor::new(source, &MonitorConfig::default());
/// monitor.register(WatchParameter::new(anchor, ["M1"], VehicleType::Bus, |event| {
///     println!("{} is {:.3} km away", event.vehicle_id, event.distance_km);
///     Ok(())
/// }))?;
/// ```
pub struct ProximityMonitor {
    registry: Arc<WatchRegistry>,
    source: Arc<dyn LivePositionPort>,
    timings: PollTimings,
    default_threshold_km: f64,
    stats: Arc<MonitorStats>,
    state: Mutex<SupervisorState>,
}

impl fmt::Debug for ProximityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityMonitor")
            .field("state", &self.state())
            .field("watches", &self.registry.len())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl ProximityMonitor {
    /// Create an idle monitor
    ///
    /// Watches registered without a threshold get
    /// `config.default_threshold_km`.
    #[must_use]
    pub fn new(source: Arc<dyn LivePositionPort>, config: &MonitorConfig) -> Self {
        let mut monitor = Self::with_timings(source, config.timings());
        monitor.default_threshold_km = config.default_threshold_km;
        monitor
    }

    /// Create an idle monitor with explicit loop timings and the built-in
    /// default threshold
    #[must_use]
    pub fn with_timings(source: Arc<dyn LivePositionPort>, timings: PollTimings) -> Self {
        Self {
            registry: Arc::new(WatchRegistry::new()),
            source,
            timings,
            default_threshold_km: DEFAULT_THRESHOLD_KM,
            stats: Arc::new(MonitorStats::default()),
            state: Mutex::new(SupervisorState::Idle),
        }
    }

    /// Register a watch and make sure the poller is running
    ///
    /// Returns as soon as the watch is stored; the first matching callback
    /// fires on a later poll cycle.
    ///
    /// # Errors
    ///
    /// `MonitorError::Stopped` after [`shutdown`](Self::shutdown) and
    /// `MonitorError::NoRuntime` when called outside a Tokio runtime. The
    /// watch is not kept in either case.
    pub fn register(&self, mut watch: WatchParameter) -> Result<WatchId, MonitorError> {
        watch.threshold_km.get_or_insert(self.default_threshold_km);
        let id = self.registry.register(watch);
        if let Err(e) = self.ensure_started() {
            self.registry.unregister(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Remove a watch; it stops matching from the next cycle
    pub fn unregister(&self, id: WatchId) -> bool {
        self.registry.unregister(id)
    }

    /// Spawn the poller unless it is already running
    ///
    /// Returns `true` only for the call that spawned it.
    pub fn ensure_started(&self) -> Result<bool, MonitorError> {
        let mut state = self.state.lock();
        match *state {
            SupervisorState::Running { .. } => return Ok(false),
            SupervisorState::Stopped => return Err(MonitorError::Stopped),
            SupervisorState::Idle => {},
        }

        let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;

        let poller = ProximityPoller::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.source),
            self.timings,
            Arc::clone(&self.stats),
        );
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = runtime.spawn(async move { poller.run(token).await });

        self.stats.record_poller_started();
        *state = SupervisorState::Running { cancel, handle };
        info!("Proximity monitor started");
        Ok(true)
    }

    /// Cancel the poller and wait for it to exit
    ///
    /// The monitor cannot be restarted afterwards.
    pub async fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), SupervisorState::Stopped);

        if let SupervisorState::Running { cancel, handle } = previous {
            cancel.cancel();
            if let Err(e) = handle.await {
                warn!(error = %e, "Proximity poller exited abnormally");
            }
            info!("Proximity monitor stopped");
        }
    }

    /// Current poller lifecycle state
    #[must_use]
    pub fn state(&self) -> PollerState {
        self.state.lock().poller_state()
    }

    /// Number of registered watches
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.registry.len()
    }

    /// Counters accumulated by the poller
    #[must_use]
    pub fn stats(&self) -> MonitorStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for ProximityMonitor {
    fn drop(&mut self) {
        if let SupervisorState::Running { cancel, .. } = self.state.get_mut() {
            cancel.cancel();
        }
    }
}
