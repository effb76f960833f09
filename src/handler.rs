//! Call-compatibility validators for listener functions.
//!
//! A candidate listener is accepted only if it satisfies two independent
//! predicates, both checked where the subscription is instantiated, never
//! deferred to a post:
//!
//! - argument compatibility: it is callable with exactly the identity's
//!   parameter list, in order ([`Handler`], or [`RawHandler`] for the
//!   out-slot-first shape);
//! - return compatibility: its result fits the chosen disposition policy
//!   ([`DispositionPolicy`](crate::DispositionPolicy) /
//!   [`SendPolicy`](crate::SendPolicy)).
//!
//! A rejected handler therefore fails with a diagnostic naming the
//! predicate, and no partial registration ever reaches the bus.

use std::sync::Arc;

use crate::identity::{for_each_arity, EventArgs};

/// A listener callable with the event's parameters, producing `Out`.
///
/// Implemented for closures and functions of matching arity, and for
/// [`Bound`] instance bindings.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot listen for events carrying `{P}`",
    label = "this handler's parameter list does not match the event's `Takes` list",
    note = "a plain listener takes the event's parameters by value, in order"
)]
pub trait Handler<P: EventArgs, Out>: Send + Sync + 'static {
    fn call(&self, args: P) -> Out;
}

/// A listener that additionally receives the out-slot reference first.
///
/// The slot is `&mut Option<V>` for value-carrying events and the `&mut ()`
/// sentinel otherwise; callees must accept it but may ignore it.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot raw-listen for events carrying `{P}` with out-slot `{S}`",
    label = "a raw handler takes `&mut` out-slot first, then the event's parameters",
    note = "the out-slot is `&mut Option<V>` for a `Ret<V>` event and `&mut ()` otherwise"
)]
pub trait RawHandler<S, P: EventArgs, Out>: Send + Sync + 'static {
    fn call(&self, slot: &mut S, args: P) -> Out;
}

/// An instance method bound to its receiver, usable wherever a free
/// function is.
///
/// Built with [`bound`]; the receiver is held as an [`Arc`] because the
/// subscription may outlive the registering scope (global listeners live
/// for the rest of the process).
pub struct Bound<T, M> {
    receiver: Arc<T>,
    method: M,
}

impl<T, M> Bound<T, M> {
    pub fn new(receiver: Arc<T>, method: M) -> Self {
        Self { receiver, method }
    }
}

impl<T, M: Clone> Clone for Bound<T, M> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
            method: self.method.clone(),
        }
    }
}

/// Binds `method` to `receiver` so the pair validates like a free function
/// whose first parameter was the receiver.
pub fn bound<T, M>(receiver: Arc<T>, method: M) -> Bound<T, M> {
    Bound::new(receiver, method)
}

/// Lifts a plain handler to the raw shape by discarding the slot
/// reference. This is how `listen` keeps the out-slot invisible.
pub(crate) struct SlotFree<F>(pub(crate) F);

impl<F, S, P, Out> RawHandler<S, P, Out> for SlotFree<F>
where
    F: Handler<P, Out>,
    S: 'static,
    P: EventArgs,
{
    fn call(&self, _slot: &mut S, args: P) -> Out {
        self.0.call(args)
    }
}

macro_rules! impl_handlers {
    ($($A:ident)*) => {
        impl<F, Out, $($A,)*> Handler<($($A,)*), Out> for F
        where
            F: Fn($($A),*) -> Out + Send + Sync + 'static,
            ($($A,)*): EventArgs,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($A,)*): ($($A,)*)) -> Out {
                (self)($($A),*)
            }
        }

        impl<F, S, Out, $($A,)*> RawHandler<S, ($($A,)*), Out> for F
        where
            F: Fn(&mut S, $($A),*) -> Out + Send + Sync + 'static,
            S: 'static,
            ($($A,)*): EventArgs,
        {
            #[allow(non_snake_case)]
            fn call(&self, slot: &mut S, ($($A,)*): ($($A,)*)) -> Out {
                (self)(slot, $($A),*)
            }
        }

        impl<T, M, Out, $($A,)*> Handler<($($A,)*), Out> for Bound<T, M>
        where
            T: Send + Sync + 'static,
            M: Fn(&T, $($A),*) -> Out + Send + Sync + 'static,
            ($($A,)*): EventArgs,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($A,)*): ($($A,)*)) -> Out {
                (self.method)(&self.receiver, $($A),*)
            }
        }

        impl<T, M, S, Out, $($A,)*> RawHandler<S, ($($A,)*), Out> for Bound<T, M>
        where
            T: Send + Sync + 'static,
            M: Fn(&T, &mut S, $($A),*) -> Out + Send + Sync + 'static,
            S: 'static,
            ($($A,)*): EventArgs,
        {
            #[allow(non_snake_case)]
            fn call(&self, slot: &mut S, ($($A,)*): ($($A,)*)) -> Out {
                (self.method)(&self.receiver, slot, $($A),*)
            }
        }
    };
}
for_each_arity!(impl_handlers);
