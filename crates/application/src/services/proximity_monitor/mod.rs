//! Live vehicle proximity monitor
//!
//! Callers register a watch (an anchor location, a distance threshold, a set
//! of routes and a callback). A single background poller periodically reads
//! the live positions of every watched route and invokes the callback for
//! each vehicle found within the threshold of the anchor.
//!
//! # Architecture
//!
//! ```text
//! ProximityMonitor ──register──▶ WatchRegistry ◀──snapshot── ProximityPoller
//!        │                                                        │
//!        └──ensure_started (spawns once)──────────────────────────┘
//!                                                                 │
//!                                          LivePositionPort ◀─────┤
//!                                          callback(&ProximityEvent)
//! ```
//!
//! - Registration never blocks on I/O and never waits for a poll cycle.
//! - Exactly one poller task exists per monitor, however many watches are
//!   registered or from how many tasks.
//! - A failed fetch or a failing callback is logged and counted, then the
//!   cycle moves on to the next route or vehicle.
//! - Shutdown cancels the poller through a `CancellationToken` and waits
//!   for it to finish.

mod config;
mod error;
mod poller;
mod registry;
mod stats;
mod supervisor;
mod watch;

#[cfg(test)]
mod test_support;

pub use config::{MonitorConfig, PollTimings};
pub use error::MonitorError;
pub use poller::{CycleReport, PollerState, ProximityPoller};
pub use registry::{RegisteredWatch, WatchRegistry};
pub use stats::{MonitorStats, MonitorStatsSnapshot};
pub use supervisor::ProximityMonitor;
pub use watch::{DEFAULT_THRESHOLD_KM, ProximityCallback, ProximityEvent, WatchId, WatchParameter};
