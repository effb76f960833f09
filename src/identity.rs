//! Event identity: the (key, parameter list, return type) triple.
//!
//! An event type is named entirely by three components carried as generic
//! parameters of [`EventType`]: a key marker (embedded key string, or
//! [`NoKey`]), the ordered parameter tuple, and a return marker ([`Ret`]
//! around the value type, or [`NoReturn`]). Two declarations are the same
//! event exactly when those three components are the same types; the bus
//! itself only ever sees the key string plus the wire shape derived from
//! the other two.
//!
//! Identities are built by replacing one component at a time with the
//! [`WithKey`], [`Takes`], and [`Returns`] aliases. Each alias produces a
//! fresh type, replaces its component wholesale, and commutes with the
//! others:
//!
//! ```
//! use typed_event::{event_key, EventType, Ret, Returns, Takes, WithKey};
//!
//! event_key!(Doubled = "math/doubled");
//!
//! type Request = Returns<Takes<WithKey<EventType, Doubled>, (i32,)>, Ret<i32>>;
//! // Same identity, steps applied in another order:
//! type AlsoRequest = Takes<Returns<WithKey<EventType, Doubled>, Ret<i32>>, (i32,)>;
//!
//! let _proof: std::marker::PhantomData<Request> = std::marker::PhantomData::<AlsoRequest>;
//! ```
//!
//! Operations that need a component reject identities lacking it at compile
//! time. Without a return type there is nothing to receive:
//!
//! ```compile_fail
//! use typed_event::{EventType, NoKey, NoReturn, Takes};
//!
//! type Fire = Takes<EventType, (i32,)>;
//! let _ = Fire::receive_with_key("math/doubled", (5,));
//! ```
//!
//! and without an embedded key the key must be given per call:
//!
//! ```compile_fail
//! use typed_event::{EventType, Takes};
//!
//! type Fire = Takes<EventType, (i32,)>;
//! Fire::post((5,));
//! ```

use std::marker::PhantomData;

/// Key marker for identities with no embedded key.
///
/// Every operation that would use the embedded key is unavailable on such
/// identities; only the `*_with_key` forms exist.
pub struct NoKey;

/// Key component of an identity: either an embedded string or nothing.
pub trait KeySpec: 'static {
    const KEY: Option<&'static str>;
}

impl KeySpec for NoKey {
    const KEY: Option<&'static str> = None;
}

/// A key marker that actually carries a string, enabling the embedded-key
/// operation family (`post`, `listen`, `send`, ... without a key argument).
///
/// Declare one with [`event_key!`](crate::event_key) rather than by hand.
pub trait EventKey: KeySpec {
    const NAME: &'static str;
}

/// Declares a key marker type carrying a string as an associated constant.
///
/// ```
/// use typed_event::event_key;
///
/// event_key!(pub SaveRequested = "editor/save-requested");
/// ```
///
/// An event key is exactly one string; passing several literals is rejected
/// outright instead of silently keeping the first.
#[macro_export]
macro_rules! event_key {
    ($vis:vis $name:ident = $key:literal) => {
        $vis struct $name;

        impl $crate::KeySpec for $name {
            const KEY: ::core::option::Option<&'static str> =
                ::core::option::Option::Some($key);
        }

        impl $crate::EventKey for $name {
            const NAME: &'static str = $key;
        }
    };
    ($vis:vis $name:ident = $key:literal, $($extra:literal),+ $(,)?) => {
        ::core::compile_error!("an event key is exactly one string literal");
    };
}

/// Return marker for identities that carry no result.
///
/// Its out-slot is the `()` sentinel: raw listeners still accept a slot
/// reference, but there is nothing to put in it, and every value-returning
/// operation (`receive`, `send`, ...) is unavailable.
pub struct NoReturn;

/// Return marker for identities whose listeners may answer with a `V`.
pub struct Ret<V>(PhantomData<V>);

/// Return component of an identity, and the out-slot shape it implies.
pub trait ReturnSpec: 'static {
    /// Storage for at most one answer, alive for one post call.
    type Slot: Default + 'static;
}

impl ReturnSpec for NoReturn {
    type Slot = ();
}

impl<V: 'static> ReturnSpec for Ret<V> {
    type Slot = Option<V>;
}

/// The ordered parameter list of an event, always written as a tuple.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an event parameter list",
    label = "parameters are declared as a tuple of up to 8 cloneable types, e.g. `(i32,)` or `(String, bool)`"
)]
pub trait EventArgs: Clone + 'static {}

// Parameter lists are cloned once per listener per post, so each element
// must be cloneable. Arities 0 through 8; the same table drives the
// handler impls.
macro_rules! for_each_arity {
    ($m:ident) => {
        $m!();
        $m!(A1);
        $m!(A1 A2);
        $m!(A1 A2 A3);
        $m!(A1 A2 A3 A4);
        $m!(A1 A2 A3 A4 A5);
        $m!(A1 A2 A3 A4 A5 A6);
        $m!(A1 A2 A3 A4 A5 A6 A7);
        $m!(A1 A2 A3 A4 A5 A6 A7 A8);
    };
}
pub(crate) use for_each_arity;

macro_rules! impl_event_args {
    ($($A:ident)*) => {
        impl<$($A: Clone + 'static),*> EventArgs for ($($A,)*) {}
    };
}
for_each_arity!(impl_event_args);

/// A fully-specified event identity.
///
/// The default identity has no key, no parameters, and no return type;
/// refine it with [`WithKey`], [`Takes`], and [`Returns`]. The type is
/// never instantiated; every operation is an associated function.
pub struct EventType<K = NoKey, P = (), R = NoReturn> {
    _shape: PhantomData<(K, P, R)>,
}

impl<K: KeySpec, P, R> EventType<K, P, R> {
    /// The embedded key string, if this identity carries one.
    pub const KEY: Option<&'static str> = K::KEY;
}

/// Projection of an identity into its three components, mostly useful for
/// copying one event's shape into another declaration.
pub trait EventDef {
    type Key: 'static;
    type Args: EventArgs;
    type Ret: ReturnSpec;
}

impl<K: 'static, P: EventArgs, R: ReturnSpec> EventDef for EventType<K, P, R> {
    type Key = K;
    type Args = P;
    type Ret = R;
}

/// `E` with its key component replaced by `K`.
pub type WithKey<E, K> = EventType<K, <E as EventDef>::Args, <E as EventDef>::Ret>;

/// `E` with its parameter list replaced wholesale by the tuple `P`.
pub type Takes<E, P> = EventType<<E as EventDef>::Key, P, <E as EventDef>::Ret>;

/// `E` with its return component replaced by `R`: `Ret<V>` to set a value
/// type, or nothing to clear it back to [`NoReturn`].
pub type Returns<E, R = NoReturn> = EventType<<E as EventDef>::Key, <E as EventDef>::Args, R>;

#[cfg(test)]
mod tests {
    use super::*;

    event_key!(TestKey = "identity/test");

    fn same_identity<T>(_: PhantomData<T>, _: PhantomData<T>) {}

    #[test]
    fn embedded_key_is_readable() {
        type Keyed = WithKey<EventType, TestKey>;
        // A bare `EventType` in expression position leaves its parameters
        // open to inference, so the keyless identity needs a named alias.
        type Bare = EventType;
        assert_eq!(Keyed::KEY, Some("identity/test"));
        assert_eq!(Bare::KEY, None);
        assert_eq!(TestKey::NAME, "identity/test");
    }

    #[test]
    fn builder_steps_commute() {
        type A = Returns<Takes<WithKey<EventType, TestKey>, (i32, String)>, Ret<bool>>;
        type B = Takes<Returns<WithKey<EventType, TestKey>, Ret<bool>>, (i32, String)>;
        type C = WithKey<Takes<Returns<EventType, Ret<bool>>, (i32, String)>, TestKey>;
        same_identity(PhantomData::<A>, PhantomData::<B>);
        same_identity(PhantomData::<B>, PhantomData::<C>);
    }

    #[test]
    fn later_steps_replace_earlier_ones() {
        type Twice = Takes<Takes<EventType, (u8,)>, (String,)>;
        same_identity(PhantomData::<Twice>, PhantomData::<Takes<EventType, (String,)>>);

        type Cleared = Returns<Returns<EventType, Ret<i32>>>;
        same_identity(PhantomData::<Cleared>, PhantomData::<EventType>);

        // An embedded key clears the same way, back to the keyless default.
        type Unkeyed = WithKey<WithKey<EventType, TestKey>, NoKey>;
        same_identity(PhantomData::<Unkeyed>, PhantomData::<EventType>);
        assert_eq!(Unkeyed::KEY, None);
    }

    #[test]
    fn shape_can_be_copied_between_declarations() {
        type Source = Takes<EventType, (i32, i32)>;
        type Copy = Takes<EventType, <Source as EventDef>::Args>;
        same_identity(PhantomData::<Source>, PhantomData::<Copy>);
    }
}
