//! Application services - Use case implementations

pub mod proximity_monitor;

pub use proximity_monitor::{
    CycleReport, DEFAULT_THRESHOLD_KM, MonitorConfig, MonitorError, MonitorStats,
    MonitorStatsSnapshot, PollTimings, PollerState, ProximityCallback, ProximityEvent,
    ProximityMonitor, ProximityPoller, RegisteredWatch, WatchId, WatchParameter, WatchRegistry,
};
