//! Poller counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::poller::CycleReport;

/// Cumulative counters updated by the poller
#[derive(Debug, Default)]
pub struct MonitorStats {
    pollers_started: AtomicU64,
    cycles: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    events: AtomicU64,
    callback_failures: AtomicU64,
}

/// Point-in-time copy of [`MonitorStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStatsSnapshot {
    /// Poller tasks spawned (at most one per monitor)
    pub pollers_started: u64,
    /// Completed poll cycles
    pub cycles: u64,
    /// Live position fetches that resolved
    pub fetches: u64,
    /// Fetches that failed or timed out
    pub fetch_failures: u64,
    /// Proximity events dispatched
    pub events: u64,
    /// Callbacks that returned an error or panicked
    pub callback_failures: u64,
}

impl MonitorStats {
    pub(crate) fn record_poller_started(&self) {
        self.pollers_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cycle(&self, report: &CycleReport) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.fetches
            .fetch_add(report.fetches as u64, Ordering::Relaxed);
        self.fetch_failures
            .fetch_add(report.fetch_failures as u64, Ordering::Relaxed);
        self.events.fetch_add(report.events as u64, Ordering::Relaxed);
        self.callback_failures
            .fetch_add(report.callback_failures as u64, Ordering::Relaxed);
    }

    /// Read all counters
    #[must_use]
    pub fn snapshot(&self) -> MonitorStatsSnapshot {
        MonitorStatsSnapshot {
            pollers_started: self.pollers_started.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            events: self.events.load(Ordering::Relaxed),
            callback_failures: self.callback_failures.load(Ordering::Relaxed),
        }
    }
}
