//! # Poolable Entities
//!
//! The contract between a pool and the entities it manages.
//!
//! An entity kind implements one of:
//! - [`TypedPoolable`] - declares a concrete payload type; the untyped entry
//!   point is derived, rejecting payloads of any other type
//! - [`Poolable`] - accepts an untyped [`Payload`] directly
//!
//! Both require [`Activation`], the host's on/off visibility switch.
//! New instances come from a [`Template`] injected into the pool.

mod membership;
mod payload;

pub use membership::{Membership, PoolHandle, PoolId};
pub use payload::Payload;

use std::any::{type_name, Any};

use crate::error::{PoolError, PoolResult};

/// Visibility/activation capability of a host entity.
///
/// Pure side effect. The pool never reads anything back.
pub trait Activation {
    /// Shows and enables (`true`) or hides and disables (`false`) the entity.
    fn set_active(&mut self, active: bool);
}

/// An entity that can be issued by a pool.
pub trait Poolable: Activation {
    /// Re-initializes the entity for a new use.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TypeMismatch`] if the payload is not something
    /// this entity can be initialized from.
    fn initialize_with(&mut self, payload: Payload) -> PoolResult<()>;
}

/// An entity with a strongly typed payload.
///
/// Every `TypedPoolable` is [`Poolable`]: the untyped initializer checks the
/// payload's runtime type and forwards to [`TypedPoolable::initialize`].
pub trait TypedPoolable: Activation {
    /// Data the entity is initialized from.
    type Payload: Any;

    /// Re-initializes the entity for a new use.
    fn initialize(&mut self, payload: Self::Payload);
}

impl<T: TypedPoolable> Poolable for T {
    fn initialize_with(&mut self, payload: Payload) -> PoolResult<()> {
        let data = payload
            .downcast::<T::Payload>()
            .map_err(|rejected| PoolError::TypeMismatch {
                entity: type_name::<T>(),
                payload: rejected.type_name(),
            })?;
        self.initialize(data);
        Ok(())
    }
}

/// Blueprint the pool grows from.
///
/// Each call constructs one new, independent entity instance.
pub trait Template {
    /// Entity type produced.
    type Entity;

    /// Constructs a new entity instance.
    fn instantiate(&self) -> Self::Entity;
}

impl<E, F> Template for F
where
    F: Fn() -> E,
{
    type Entity = E;

    fn instantiate(&self) -> E {
        self()
    }
}

/// Template that clones a prototype value.
#[derive(Clone, Debug)]
pub struct Prototype<E>(E);

impl<E: Clone> Prototype<E> {
    /// Uses `prototype` as the blueprint for every new instance.
    #[must_use]
    pub const fn new(prototype: E) -> Self {
        Self(prototype)
    }

    /// Returns the blueprint value.
    #[must_use]
    pub const fn prototype(&self) -> &E {
        &self.0
    }
}

impl<E: Clone> Template for Prototype<E> {
    type Entity = E;

    fn instantiate(&self) -> E {
        self.0.clone()
    }
}
