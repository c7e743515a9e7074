//! # Untyped Payload
//!
//! Opaque initialization data handed to an entity when it is taken from a
//! pool. Keeps the pool's entry point homogeneous while each entity kind
//! declares its own concrete payload type.

use std::any::{type_name, Any};
use std::fmt;

/// Type-erased initialization data.
///
/// Remembers the name of the type it was built from so a rejected payload
/// can be reported by name.
pub struct Payload {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Payload {
    /// Wraps a value as an untyped payload.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// A payload carrying `()`, for entities that need no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Returns the name of the wrapped value's type.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if the wrapped value is a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Unwraps the value as a `T`.
    ///
    /// # Errors
    ///
    /// Gives the payload back unchanged if it does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { value, type_name }),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_downcast() {
        let payload = Payload::new(42_u32);
        assert!(payload.is::<u32>());
        assert_eq!(payload.downcast::<u32>().unwrap(), 42);
    }

    #[test]
    fn test_payload_wrong_type_is_returned() {
        let payload = Payload::new("spawn");
        let back = payload.downcast::<u32>().unwrap_err();
        assert_eq!(back.type_name(), "&str");
        assert_eq!(back.downcast::<&str>().unwrap(), "spawn");
    }

    #[test]
    fn test_empty_payload_is_unit() {
        assert!(Payload::empty().is::<()>());
    }
}
