//! # Type-Erased Pool Management
//!
//! [`PoolManager`] is the part of a pool's API that doesn't mention the
//! entity type, so pools of different entity kinds can be driven together.
//! [`PoolGroup`] uses it to open and flush the release buffers of every
//! registered pool at once, typically around a frame's update.

use std::any::Any;

use super::Pool;
use crate::entity::{PoolHandle, PoolId, Poolable};
use crate::error::{PoolError, PoolResult};

/// Entity-agnostic pool operations.
pub trait PoolManager: Any {
    /// Returns the pool's id.
    fn id(&self) -> PoolId;

    /// Returns the pool's name.
    fn name(&self) -> &str;

    /// Returns the number of slots, in any state.
    fn len(&self) -> usize;

    /// Returns true if no slot has been constructed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entity behind `handle` to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Ownership`] if the pool did not issue `handle`.
    fn release(&mut self, handle: PoolHandle) -> PoolResult<()>;

    /// Hides every entity and drops all slots.
    fn release_all(&mut self);

    /// Routes subsequent releases into the release buffer.
    fn start_release_buffer(&mut self);

    /// Turns the release buffer off and frees every buffered slot.
    fn release_from_buffer(&mut self);

    /// Returns the buffered releases, oldest first.
    fn release_buffer(&self) -> &[PoolHandle];

    /// Upcast for downcasting back to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting back to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Poolable + 'static> PoolManager for Pool<E> {
    fn id(&self) -> PoolId {
        Pool::id(self)
    }

    fn name(&self) -> &str {
        Pool::name(self)
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn release(&mut self, handle: PoolHandle) -> PoolResult<()> {
        Pool::release(self, handle)
    }

    fn release_all(&mut self) {
        Pool::release_all(self);
    }

    fn start_release_buffer(&mut self) {
        Pool::start_release_buffer(self);
    }

    fn release_from_buffer(&mut self) {
        Pool::release_from_buffer(self);
    }

    fn release_buffer(&self) -> &[PoolHandle] {
        Pool::release_buffer(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A set of pools driven as one.
#[derive(Default)]
pub struct PoolGroup {
    pools: Vec<Box<dyn PoolManager>>,
}

impl PoolGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pool to the group and returns its id.
    pub fn register<E: Poolable + 'static>(&mut self, pool: Pool<E>) -> PoolId {
        let id = pool.id();
        self.pools.push(Box::new(pool));
        id
    }

    /// Returns the number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns true if no pool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Gets a registered pool by id, without its entity type.
    #[must_use]
    pub fn manager(&self, id: PoolId) -> Option<&dyn PoolManager> {
        self.pools.iter().find(|p| p.id() == id).map(AsRef::as_ref)
    }

    /// Gets a registered pool by id.
    ///
    /// Returns `None` if no such pool exists or it holds a different
    /// entity type.
    #[must_use]
    pub fn get<E: Poolable + 'static>(&self, id: PoolId) -> Option<&Pool<E>> {
        self.manager(id)?.as_any().downcast_ref()
    }

    /// Gets a registered pool by id, mutably.
    pub fn get_mut<E: Poolable + 'static>(&mut self, id: PoolId) -> Option<&mut Pool<E>> {
        self.pools
            .iter_mut()
            .find(|p| p.id() == id)?
            .as_any_mut()
            .downcast_mut()
    }

    /// Releases `handle` to whichever registered pool issued it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Ownership`] if no registered pool issued
    /// `handle`.
    pub fn release(&mut self, handle: PoolHandle) -> PoolResult<()> {
        match self.pools.iter_mut().find(|p| p.id() == handle.pool()) {
            Some(pool) => pool.release(handle),
            None => Err(PoolError::Ownership {
                pool: handle.pool(),
                what: handle.to_string(),
            }),
        }
    }

    /// Opens the release buffer of every pool.
    pub fn start_release_buffer(&mut self) {
        for pool in &mut self.pools {
            pool.start_release_buffer();
        }
    }

    /// Flushes the release buffer of every pool.
    pub fn release_from_buffer(&mut self) {
        for pool in &mut self.pools {
            pool.release_from_buffer();
        }
        tracing::debug!("Flushed release buffers of {} pools", self.pools.len());
    }

    /// Resets every pool.
    pub fn release_all(&mut self) {
        for pool in &mut self.pools {
            pool.release_all();
        }
    }

    /// Iterates over the registered pools.
    pub fn iter(&self) -> impl Iterator<Item = &dyn PoolManager> {
        self.pools.iter().map(AsRef::as_ref)
    }
}
