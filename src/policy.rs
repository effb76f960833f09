//! Disposition policies: who decides whether a post keeps propagating.
//!
//! Every listener registration names a policy. [`Fixed`] supplies a
//! constant disposition and the handler's own return value stays out of
//! the propagation decision; [`HandlerDecided`] makes the handler's return
//! value authoritative. The pairing between policy and handler return type
//! is part of signature validation, so a mismatched pair is rejected where
//! the listener is registered.

use crate::bus::Disposition;

/// Always answer the bus with the given disposition.
///
/// Plain and raw listeners under this policy return `()`; senders return
/// just their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub Disposition);

/// Let the handler's return value supply the disposition.
///
/// Plain and raw listeners under this policy return [`Disposition`];
/// senders return a `(Disposition, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerDecided;

/// Resolves a listening handler's output to the bus disposition.
#[diagnostic::on_unimplemented(
    message = "a listener returning `{Out}` does not fit the `{Self}` disposition policy",
    label = "with `Fixed(..)` a listener returns `()`; with `HandlerDecided` it returns `Disposition`"
)]
pub trait DispositionPolicy<Out>: Copy + Send + Sync + 'static {
    fn resolve(self, out: Out) -> Disposition;
}

impl DispositionPolicy<()> for Fixed {
    fn resolve(self, _out: ()) -> Disposition {
        self.0
    }
}

impl DispositionPolicy<Disposition> for HandlerDecided {
    fn resolve(self, out: Disposition) -> Disposition {
        out
    }
}

/// Resolves a sending handler's output to a disposition plus the value
/// destined for the out-slot.
#[diagnostic::on_unimplemented(
    message = "a sender returning `{Out}` does not fit the `{Self}` disposition policy for `{V}` values",
    label = "with `Fixed(..)` a sender returns the value; with `HandlerDecided` it returns `(Disposition, value)`"
)]
pub trait SendPolicy<V, Out>: Copy + Send + Sync + 'static {
    fn resolve(self, out: Out) -> (Disposition, V);
}

impl<V> SendPolicy<V, V> for Fixed {
    fn resolve(self, out: V) -> (Disposition, V) {
        (self.0, out)
    }
}

impl<V> SendPolicy<V, (Disposition, V)> for HandlerDecided {
    fn resolve(self, out: (Disposition, V)) -> (Disposition, V) {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ignores_handler_output() {
        assert_eq!(
            DispositionPolicy::resolve(Fixed(Disposition::Stop), ()),
            Disposition::Stop
        );
        assert_eq!(
            DispositionPolicy::resolve(Fixed(Disposition::Propagate), ()),
            Disposition::Propagate
        );
    }

    #[test]
    fn handler_decided_passes_output_through() {
        assert_eq!(
            DispositionPolicy::resolve(HandlerDecided, Disposition::Stop),
            Disposition::Stop
        );
    }

    #[test]
    fn send_policies_split_value_and_disposition() {
        let (d, v) = SendPolicy::resolve(Fixed(Disposition::Stop), 42);
        assert_eq!((d, v), (Disposition::Stop, 42));

        let (d, v) = SendPolicy::resolve(HandlerDecided, (Disposition::Propagate, "x"));
        assert_eq!((d, v), (Disposition::Propagate, "x"));
    }
}
