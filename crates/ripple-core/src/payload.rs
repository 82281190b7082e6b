//! Opaque payload values carried by emissions.
//!
//! A payload is attached to an emission at the source and carried
//! through every copy and reflection unchanged; the engine never looks
//! inside it. Receivers that understand the payload type can recover it
//! with [`Payload::downcast_ref`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A cheaply cloneable, opaque value attached to an emission.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    /// The empty payload.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a value as an opaque payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Whether no value is attached.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Recover the payload as a `T`, if one of that type is attached.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "Payload(<opaque>)")
        } else {
            write!(f, "Payload(none)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_recovers_the_value() {
        let p = Payload::new(42u32);
        assert!(!p.is_none());
        assert_eq!(p.downcast_ref::<u32>(), Some(&42));
        assert_eq!(p.downcast_ref::<String>(), None);
    }

    #[test]
    fn clones_share_the_value() {
        let p = Payload::new(String::from("beacon"));
        let q = p.clone();
        assert_eq!(q.downcast_ref::<String>().unwrap(), "beacon");
    }

    #[test]
    fn empty_payload() {
        let p = Payload::none();
        assert!(p.is_none());
        assert_eq!(p.downcast_ref::<u32>(), None);
    }
}
