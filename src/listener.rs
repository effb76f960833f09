//! Owned and bus-retained listener handles.
//!
//! Registering a listener yields a [`ListenerGuard`]: the registering
//! caller exclusively owns the subscription, and dropping the guard (or
//! calling [`unregister`](ListenerGuard::unregister)) removes it from the
//! bus. The `global_*` operation family instead hands ownership to the bus
//! for the rest of the process via [`into_global`](ListenerGuard::into_global),
//! leaving the caller an unowned [`ListenerRef`] for optional explicit
//! teardown.
//!
//! A subscription has exactly two states, registered then unregistered,
//! and never returns to the first.

use crate::bus::{Bus, ListenerId};

/// Exclusive ownership of one active subscription.
#[must_use = "dropping the guard unregisters the listener immediately"]
pub struct ListenerGuard {
    bus: &'static Bus,
    key: String,
    id: ListenerId,
    armed: bool,
}

impl ListenerGuard {
    pub(crate) fn new(bus: &'static Bus, key: &str, id: ListenerId) -> Self {
        Self {
            bus,
            key: key.to_owned(),
            id,
            armed: true,
        }
    }

    /// The key this listener is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unregister now instead of at end of scope. Terminal.
    pub fn unregister(self) {
        // Drop does the work.
    }

    /// Relinquish ownership to the bus: the subscription now lives for the
    /// rest of the process unless torn down through the returned
    /// [`ListenerRef`].
    pub fn into_global(mut self) -> ListenerRef {
        self.armed = false;
        ListenerRef {
            bus: self.bus,
            key: self.key.clone(),
            id: self.id,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if self.armed {
            self.bus.unsubscribe(&self.key, self.id);
        }
    }
}

/// Unowned reference to a bus-retained subscription.
#[derive(Clone)]
pub struct ListenerRef {
    bus: &'static Bus,
    key: String,
    id: ListenerId,
}

impl ListenerRef {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Tear the subscription down explicitly. Returns whether it was still
    /// registered.
    pub fn unregister(&self) -> bool {
        self.bus.unsubscribe(&self.key, self.id)
    }
}

impl std::fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRef")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("armed", &self.armed)
            .finish()
    }
}
