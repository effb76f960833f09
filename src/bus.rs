//! The ambient string-keyed publish/subscribe registry.
//!
//! This is the external collaborator every typed operation ultimately talks
//! to. It matches posted payloads to registered callbacks by key string
//! alone, invokes them in registration order, and answers with a
//! [`Disposition`]. It knows nothing about parameter lists or return types;
//! the typed layer encodes those in the payload it hands over.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

/// Whether the bus should keep notifying further listeners for this post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Halt the post; no later listener runs.
    Stop,
    /// Let the post continue to the next listener.
    Propagate,
}

/// Identifies one registration on one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&mut dyn Any) -> Disposition + Send + Sync>;

struct Registration {
    id: ListenerId,
    callback: Callback,
}

/// Process-wide registry matching posts to callbacks by key string.
///
/// Freestanding instances exist so the registry itself can be tested in
/// isolation; everything in the typed layer goes through [`Bus::global`].
pub struct Bus {
    registry: RwLock<HashMap<String, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The ambient process-wide instance.
    pub fn global() -> &'static Bus {
        static GLOBAL: OnceLock<Bus> = OnceLock::new();
        GLOBAL.get_or_init(Bus::new)
    }

    /// Register a callback under `key`.
    ///
    /// The returned [`ListenerId`] is the only way to remove the
    /// registration again; the typed layer wraps it in a guard.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> ListenerId
    where
        F: Fn(&mut dyn Any) -> Disposition + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry
            .write()
            .entry(key.to_owned())
            .or_default()
            .push(Registration {
                id,
                callback: Arc::new(callback),
            });
        tracing::debug!(key, id = id.0, "listener registered");
        id
    }

    /// Remove one registration. Returns whether it was still present.
    pub fn unsubscribe(&self, key: &str, id: ListenerId) -> bool {
        let mut registry = self.registry.write();
        let Some(registrations) = registry.get_mut(key) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            registry.remove(key);
        }
        if removed {
            tracing::debug!(key, id = id.0, "listener unregistered");
        }
        removed
    }

    /// Submit one payload to every callback registered under `key`.
    ///
    /// Listeners run in registration order until one answers
    /// [`Disposition::Stop`]. A key with no listeners is not an error; the
    /// post simply answers [`Disposition::Propagate`].
    pub fn post(&self, key: &str, payload: &mut dyn Any) -> Disposition {
        // Snapshot the callbacks before invoking any of them, so a listener
        // may subscribe or unsubscribe re-entrantly without holding up the
        // registry lock.
        let callbacks: Vec<Callback> = match self.registry.read().get(key) {
            Some(registrations) => registrations.iter().map(|r| r.callback.clone()).collect(),
            None => return Disposition::Propagate,
        };
        tracing::trace!(key, listeners = callbacks.len(), "posting");
        for callback in &callbacks {
            if callback(payload) == Disposition::Stop {
                return Disposition::Stop;
            }
        }
        Disposition::Propagate
    }

    /// Number of registrations currently held under `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.registry.read().get(key).map_or(0, Vec::len)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn posts_reach_matching_key_only() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        bus.subscribe("a", move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            Disposition::Propagate
        });

        assert_eq!(bus.post("a", &mut 1u32), Disposition::Propagate);
        assert_eq!(bus.post("b", &mut 1u32), Disposition::Propagate);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_halts_later_listeners() {
        let bus = Bus::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let o = order.clone();
        bus.subscribe("k", move |_| {
            o.lock().push("first");
            Disposition::Stop
        });
        let o = order.clone();
        bus.subscribe("k", move |_| {
            o.lock().push("second");
            Disposition::Propagate
        });

        assert_eq!(bus.post("k", &mut ()), Disposition::Stop);
        assert_eq!(*order.lock(), vec!["first"]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registration() {
        let bus = Bus::new();
        let first = bus.subscribe("k", |_| Disposition::Propagate);
        let second = bus.subscribe("k", |_| Disposition::Propagate);
        assert_eq!(bus.listener_count("k"), 2);

        assert!(bus.unsubscribe("k", first));
        assert!(!bus.unsubscribe("k", first));
        assert_eq!(bus.listener_count("k"), 1);

        assert!(bus.unsubscribe("k", second));
        assert_eq!(bus.listener_count("k"), 0);
        assert!(!bus.unsubscribe("missing", second));
    }

    #[test]
    fn listener_may_subscribe_reentrantly() {
        let bus = Arc::new(Bus::new());

        let bus_clone = bus.clone();
        bus.subscribe("outer", move |_| {
            bus_clone.subscribe("inner", |_| Disposition::Propagate);
            Disposition::Propagate
        });

        assert_eq!(bus.post("outer", &mut ()), Disposition::Propagate);
        assert_eq!(bus.listener_count("inner"), 1);
    }

    #[test]
    fn payload_is_shared_mutably_across_listeners() {
        let bus = Bus::new();
        bus.subscribe("sum", |payload| {
            if let Some(n) = payload.downcast_mut::<u32>() {
                *n += 10;
            }
            Disposition::Propagate
        });
        bus.subscribe("sum", |payload| {
            if let Some(n) = payload.downcast_mut::<u32>() {
                *n += 1;
            }
            Disposition::Propagate
        });

        let mut n = 0u32;
        bus.post("sum", &mut n);
        assert_eq!(n, 11);
    }
}
