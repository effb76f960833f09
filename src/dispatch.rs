//! Dispatch adapter: from a typed identity to the ambient bus and back.
//!
//! Everything the crate can do reduces to the four primitives defined
//! here, each taking its key explicitly:
//!
//! - [`raw_post_with_key`](EventType::raw_post_with_key): submit one
//!   event, threading the caller's own out-slot through the bus;
//! - [`receive_both_with_key`](EventType::receive_both_with_key): submit
//!   with a fresh out-slot and read it back;
//! - [`raw_listen_with_key`](EventType::raw_listen_with_key): register a
//!   handler that sees the out-slot directly;
//! - [`send_with_key`](EventType::send_with_key): register a handler
//!   whose return value fills the out-slot.
//!
//! The non-raw forms (`post_with_key`, `receive_with_key`,
//! `listen_with_key`) are thin specializations that keep the out-slot
//! invisible, and the whole derived surface in `surface` is these
//! functions partially applied.
//!
//! On the wire the bus sees an [`Envelope`]: the cloned argument tuple
//! plus the owned slot, passed as `&mut dyn Any`. The bus matches by key
//! string only, so a registration whose envelope shape differs (same key,
//! different identity) is skipped rather than invoked wrongly.

use std::any::Any;
use std::marker::PhantomData;
use std::mem;

use crate::bus::{Bus, Disposition};
use crate::handler::{Handler, RawHandler, SlotFree};
use crate::identity::{EventArgs, EventType, Ret, ReturnSpec};
use crate::listener::ListenerGuard;
use crate::policy::{DispositionPolicy, HandlerDecided, SendPolicy};

/// Wire payload for one post: the argument tuple plus the out-slot.
pub(crate) struct Envelope<P, R: ReturnSpec> {
    pub(crate) args: P,
    pub(crate) slot: R::Slot,
}

impl<K: 'static, P: EventArgs, R: ReturnSpec> EventType<K, P, R> {
    /// Submit one event under an explicit key, threading `slot` through
    /// the bus so listeners can answer into it.
    ///
    /// If no listener writes the slot it comes back exactly as the caller
    /// initialized it.
    pub fn raw_post_with_key(key: &str, slot: &mut R::Slot, args: P) -> Disposition {
        let mut envelope = Envelope::<P, R> {
            args,
            slot: mem::take(slot),
        };
        let disposition = Bus::global().post(key, &mut envelope);
        *slot = envelope.slot;
        disposition
    }

    /// Submit one event under an explicit key with no out-slot; any value
    /// a sender produces is discarded.
    pub fn post_with_key(key: &str, args: P) -> Disposition {
        let mut slot: R::Slot = Default::default();
        Self::raw_post_with_key(key, &mut slot, args)
    }

    /// Register a raw listener under an explicit key: `handler` receives
    /// the out-slot reference first, then the event's parameters.
    pub fn raw_listen_with_key<F, Out, Pol>(key: &str, policy: Pol, handler: F) -> ListenerGuard
    where
        F: RawHandler<R::Slot, P, Out>,
        Pol: DispositionPolicy<Out>,
    {
        let bus = Bus::global();
        let shape_key = key.to_owned();
        let id = bus.subscribe(key, move |payload: &mut dyn Any| {
            let Some(envelope) = payload.downcast_mut::<Envelope<P, R>>() else {
                tracing::warn!(
                    key = %shape_key,
                    "envelope shape mismatch under shared key; listener skipped"
                );
                return Disposition::Propagate;
            };
            let args = envelope.args.clone();
            policy.resolve(handler.call(&mut envelope.slot, args))
        });
        ListenerGuard::new(bus, key, id)
    }

    /// Register a plain listener under an explicit key; the adapter
    /// threads the out-slot so the handler never sees it.
    pub fn listen_with_key<F, Out, Pol>(key: &str, policy: Pol, handler: F) -> ListenerGuard
    where
        F: Handler<P, Out>,
        Pol: DispositionPolicy<Out>,
    {
        Self::raw_listen_with_key(key, policy, SlotFree(handler))
    }
}

impl<K: 'static, P: EventArgs, V: 'static> EventType<K, P, Ret<V>> {
    /// Submit one event under an explicit key with a fresh out-slot and
    /// read it back together with the bus disposition.
    ///
    /// `None` is the observable "no listener answered" outcome; the slot
    /// never carries anything a listener did not put there.
    pub fn receive_both_with_key(key: &str, args: P) -> (Disposition, Option<V>) {
        let mut slot = None;
        let disposition = Self::raw_post_with_key(key, &mut slot, args);
        (disposition, slot)
    }

    /// Like [`receive_both_with_key`](Self::receive_both_with_key),
    /// keeping only the answer.
    pub fn receive_with_key(key: &str, args: P) -> Option<V> {
        Self::receive_both_with_key(key, args).1
    }

    /// Register a sender under an explicit key: a listener whose return
    /// value is authoritative for the out-slot.
    pub fn send_with_key<F, Out, Pol>(key: &str, policy: Pol, handler: F) -> ListenerGuard
    where
        F: Handler<P, Out>,
        Out: 'static,
        Pol: SendPolicy<V, Out>,
    {
        Self::raw_listen_with_key(
            key,
            HandlerDecided,
            Sending {
                handler,
                policy,
                _out: PhantomData,
            },
        )
    }
}

/// Raw adapter that fills the out-slot from a sender's value and answers
/// the policy's disposition.
struct Sending<F, Pol, Out> {
    handler: F,
    policy: Pol,
    _out: PhantomData<fn() -> Out>,
}

impl<F, Pol, P, V, Out> RawHandler<Option<V>, P, Disposition> for Sending<F, Pol, Out>
where
    P: EventArgs,
    V: 'static,
    Out: 'static,
    F: Handler<P, Out>,
    Pol: SendPolicy<V, Out>,
{
    fn call(&self, slot: &mut Option<V>, args: P) -> Disposition {
        let (disposition, value) = self.policy.resolve(self.handler.call(args));
        *slot = Some(value);
        disposition
    }
}
