//! Statically-typed event facade over an ambient string-keyed
//! publish/subscribe bus.
//!
//! Declare an event's identity once as a type, then post, listen, and
//! send against it; argument lists, return values, and key usage are all
//! checked where they are written, while delivery stays dynamic and
//! string-keyed underneath.
//!
//! ```
//! use typed_event::{event_key, Disposition, EventType, Fixed, Ret, Returns, Takes, WithKey};
//!
//! event_key!(Doubled = "math/doubled");
//! type Doubling = Returns<Takes<WithKey<EventType, Doubled>, (i32,)>, Ret<i32>>;
//!
//! let _sender = Doubling::send(Fixed(Disposition::Stop), |x: i32| x * 2);
//! assert_eq!(Doubling::receive((21,)), Some(42));
//! ```

mod bus;
mod dispatch;
mod handler;
mod identity;
mod listener;
mod policy;
mod surface;

pub use bus::{Bus, Disposition, ListenerId};
pub use handler::{bound, Bound, Handler, RawHandler};
pub use identity::{
    EventArgs, EventDef, EventKey, EventType, KeySpec, NoKey, NoReturn, Ret, Returns, ReturnSpec,
    Takes, WithKey,
};
pub use listener::{ListenerGuard, ListenerRef};
pub use policy::{DispositionPolicy, Fixed, HandlerDecided, SendPolicy};

// `event_key!` is #[macro_export]ed from the identity module and lands at
// the crate root on its own.
