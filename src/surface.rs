//! The derived operation surface.
//!
//! Each listener family (plain, raw, sending) has exactly one base
//! operation, defined in `dispatch`. The rest of the surface is this base
//! crossed with three axes:
//!
//! - binding: free function vs. instance method (`*_on`, via
//!   [`Bound`]);
//! - scope: caller-owned guard vs. bus-retained registration
//!   (`global_*`, via [`ListenerGuard::into_global`]);
//! - key source: explicit per call (`*_with_key`) vs. embedded in the
//!   identity (requires [`EventKey`]).
//!
//! [`listener_surface!`] stamps the whole cross-product as one-line
//! partial applications of the base, so no derived operation carries any
//! dispatch logic of its own and a new family only needs one more macro
//! invocation. The four posting derivations at the bottom are the same
//! idea written out, there being too few of them to warrant a table.

use std::sync::Arc;

use crate::bus::Disposition;
use crate::handler::{Bound, Handler, RawHandler};
use crate::identity::{EventArgs, EventKey, EventType, Ret, ReturnSpec};
use crate::listener::{ListenerGuard, ListenerRef};
use crate::policy::{DispositionPolicy, SendPolicy};

/// Derives one listener family's full surface from its base operation.
///
/// `handler` and `policy` are the family's validator bounds, spelled in
/// terms of the surrounding impl block's generics.
macro_rules! listener_surface {
    (
        base: $base:ident,
        on: $on:ident,
        global: $global:ident,
        global_on: $global_on:ident,
        keyed: ($kbase:ident, $kon:ident, $kglobal:ident, $kglobal_on:ident),
        handler: { $($H:tt)+ },
        policy: { $($Pol:tt)+ },
    ) => {
        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") \
            for an instance method: `method` is bound to `receiver` and \
            validated like a free function whose first parameter was the \
            receiver.")]
        pub fn $on<T, M, Out, Pol>(
            key: &str,
            policy: Pol,
            receiver: Arc<T>,
            method: M,
        ) -> ListenerGuard
        where
            Bound<T, M>: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$base(key, policy, Bound::new(receiver, method))
        }

        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") \
            with the subscription handed to the bus for the rest of the \
            process; the returned reference allows optional explicit \
            teardown.")]
        pub fn $global<F, Out, Pol>(key: &str, policy: Pol, handler: F) -> ListenerRef
        where
            F: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$base(key, policy, handler).into_global()
        }

        #[doc = concat!("[`", stringify!($on), "`](Self::", stringify!($on), ") \
            with the subscription handed to the bus for the rest of the \
            process.")]
        pub fn $global_on<T, M, Out, Pol>(
            key: &str,
            policy: Pol,
            receiver: Arc<T>,
            method: M,
        ) -> ListenerRef
        where
            Bound<T, M>: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$on(key, policy, receiver, method).into_global()
        }

        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") \
            under the identity's embedded key.")]
        pub fn $kbase<F, Out, Pol>(policy: Pol, handler: F) -> ListenerGuard
        where
            K: EventKey,
            F: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$base(K::NAME, policy, handler)
        }

        #[doc = concat!("[`", stringify!($on), "`](Self::", stringify!($on), ") \
            under the identity's embedded key.")]
        pub fn $kon<T, M, Out, Pol>(policy: Pol, receiver: Arc<T>, method: M) -> ListenerGuard
        where
            K: EventKey,
            Bound<T, M>: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$on(K::NAME, policy, receiver, method)
        }

        #[doc = concat!("[`", stringify!($global), "`](Self::", stringify!($global), ") \
            under the identity's embedded key.")]
        pub fn $kglobal<F, Out, Pol>(policy: Pol, handler: F) -> ListenerRef
        where
            K: EventKey,
            F: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$global(K::NAME, policy, handler)
        }

        #[doc = concat!("[`", stringify!($global_on), "`](Self::", stringify!($global_on), ") \
            under the identity's embedded key.")]
        pub fn $kglobal_on<T, M, Out, Pol>(policy: Pol, receiver: Arc<T>, method: M) -> ListenerRef
        where
            K: EventKey,
            Bound<T, M>: $($H)+,
            Out: 'static,
            Pol: $($Pol)+,
        {
            Self::$global_on(K::NAME, policy, receiver, method)
        }
    };
}

impl<K: 'static, P: EventArgs, R: ReturnSpec> EventType<K, P, R> {
    listener_surface! {
        base: listen_with_key,
        on: listen_with_key_on,
        global: global_listen_with_key,
        global_on: global_listen_with_key_on,
        keyed: (listen, listen_on, global_listen, global_listen_on),
        handler: { Handler<P, Out> },
        policy: { DispositionPolicy<Out> },
    }

    listener_surface! {
        base: raw_listen_with_key,
        on: raw_listen_with_key_on,
        global: global_raw_listen_with_key,
        global_on: global_raw_listen_with_key_on,
        keyed: (raw_listen, raw_listen_on, global_raw_listen, global_raw_listen_on),
        handler: { RawHandler<<R as ReturnSpec>::Slot, P, Out> },
        policy: { DispositionPolicy<Out> },
    }

    /// [`post_with_key`](Self::post_with_key) under the identity's
    /// embedded key.
    pub fn post(args: P) -> Disposition
    where
        K: EventKey,
    {
        Self::post_with_key(K::NAME, args)
    }

    /// [`raw_post_with_key`](Self::raw_post_with_key) under the
    /// identity's embedded key.
    pub fn raw_post(slot: &mut R::Slot, args: P) -> Disposition
    where
        K: EventKey,
    {
        Self::raw_post_with_key(K::NAME, slot, args)
    }
}

impl<K: 'static, P: EventArgs, V: 'static> EventType<K, P, Ret<V>> {
    listener_surface! {
        base: send_with_key,
        on: send_with_key_on,
        global: global_send_with_key,
        global_on: global_send_with_key_on,
        keyed: (send, send_on, global_send, global_send_on),
        handler: { Handler<P, Out> },
        policy: { SendPolicy<V, Out> },
    }

    /// [`receive_with_key`](Self::receive_with_key) under the identity's
    /// embedded key.
    pub fn receive(args: P) -> Option<V>
    where
        K: EventKey,
    {
        Self::receive_with_key(K::NAME, args)
    }

    /// [`receive_both_with_key`](Self::receive_both_with_key) under the
    /// identity's embedded key.
    pub fn receive_both(args: P) -> (Disposition, Option<V>)
    where
        K: EventKey,
    {
        Self::receive_both_with_key(K::NAME, args)
    }
}
