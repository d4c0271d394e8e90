//! Thread-safe registry of proximity watches

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use super::watch::{WatchId, WatchParameter};

/// A watch together with the identifier it was registered under
#[derive(Debug, Clone)]
pub struct RegisteredWatch {
    /// Registry identifier
    pub id: WatchId,
    /// Shared watch definition
    pub watch: Arc<WatchParameter>,
}

/// Registry of active watches
///
/// Appends take a short write lock. Readers take a snapshot, so a poll cycle
/// iterating over its copy never observes a concurrent registration halfway.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    watches: RwLock<Vec<RegisteredWatch>>,
    next_id: AtomicU64,
}

impl WatchRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a watch and return its identifier
    pub fn register(&self, watch: WatchParameter) -> WatchId {
        let mut watches = self.watches.write();
        let id = WatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            watch_id = %id,
            routes = ?watch.routes,
            threshold_km = watch.effective_threshold_km(),
            "Registered proximity watch"
        );
        watches.push(RegisteredWatch {
            id,
            watch: Arc::new(watch),
        });
        id
    }

    /// Remove a watch, returning whether it was present
    pub fn unregister(&self, id: WatchId) -> bool {
        let mut watches = self.watches.write();
        let before = watches.len();
        watches.retain(|entry| entry.id != id);
        let removed = watches.len() != before;
        if removed {
            debug!(watch_id = %id, "Unregistered proximity watch");
        }
        removed
    }

    /// Copy of the registered watches in registration order
    #[must_use]
    pub fn snapshot(&self) -> Vec<RegisteredWatch> {
        self.watches.read().clone()
    }

    /// Number of registered watches
    #[must_use]
    pub fn len(&self) -> usize {
        self.watches.read().len()
    }

    /// Whether no watch is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watches.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{GeoLocation, VehicleType};

    fn watch(route: &str) -> WatchParameter {
        WatchParameter::new(GeoLocation::male(), [route], VehicleType::Bus, |_| Ok(()))
    }

    #[test]
    fn register_preserves_order_and_ids_increase() {
        let registry = WatchRegistry::new();
        let first = registry.register(watch("A"));
        let second = registry.register(watch("B"));
        assert!(second > first);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, first);
        assert_eq!(snapshot[0].watch.routes, vec!["A".to_string()]);
        assert_eq!(snapshot[1].watch.routes, vec!["B".to_string()]);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_registrations() {
        let registry = WatchRegistry::new();
        registry.register(watch("A"));
        let snapshot = registry.snapshot();
        registry.register(watch("B"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregister_removes_only_matching_watch() {
        let registry = WatchRegistry::new();
        let a = registry.register(watch("A"));
        let b = registry.register(watch("B"));

        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, b);
    }

    #[test]
    fn empty_registry() {
        let registry = WatchRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn concurrent_registration_keeps_every_watch() {
        let registry = Arc::new(WatchRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        registry.register(watch(&format!("R{t}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 200);
        let mut ids: Vec<_> = snapshot.iter().map(|entry| entry.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
