//! # Entity Pool
//!
//! Growable slot pool for entities that are expensive to construct and cheap
//! to re-initialize (bullets, particles, spawned actors).
//!
//! Every slot is either:
//! - **free** - in the free set, entity inactive
//! - **active** - issued to a caller, entity active
//! - **pending** - released while the release buffer was on; entity
//!   inactive, slot not reusable until [`Pool::release_from_buffer`]
//!
//! Slots are recycled, never removed. Storage only shrinks on
//! [`Pool::release_all`].

mod iter;
mod manager;

pub use iter::{ActiveIter, ActiveIterMut};
pub use manager::{PoolGroup, PoolManager};

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;

use crate::config::PoolConfig;
use crate::entity::{Membership, Payload, PoolHandle, PoolId, Poolable, Template, TypedPoolable};
use crate::error::{PoolError, PoolResult};

/// One storage position: an entity plus the identity the pool gave it.
struct Slot<E> {
    entity: E,
    membership: Membership,
}

/// Counters describing a pool at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total slots constructed.
    pub slots: usize,
    /// Slots issued to callers.
    pub active: usize,
    /// Slots ready for reuse.
    pub free: usize,
    /// Slots released into the buffer, awaiting a flush.
    pub pending: usize,
}

/// A pool of reusable entities.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. All mutation goes through `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = Pool::new(|| Bullet::default());
///
/// let bullet = pool.create_typed(BulletSpawn { speed: 40.0 });
/// pool.get_mut(bullet).unwrap().tick(dt);
///
/// // Frame end: recycle everything that despawned this frame
/// pool.start_release_buffer();
/// pool.release(bullet)?;
/// pool.release_from_buffer();
/// ```
pub struct Pool<E> {
    /// Identity checked by every release.
    id: PoolId,
    /// Name used in log events.
    name: String,
    /// Bumped by every full reset. 64 bits, so it never wraps in practice.
    epoch: u64,
    /// Backing storage, indexed by slot.
    slots: Vec<Slot<E>>,
    /// Indices of reusable slots.
    free: BTreeSet<usize>,
    /// Blueprint for growth.
    template: Box<dyn Template<Entity = E>>,
    /// Whether releases currently go to the buffer.
    buffering: bool,
    /// Releases awaiting a flush, in release order.
    release_buffer: Vec<PoolHandle>,
}

impl<E: Poolable> Pool<E> {
    /// Creates an empty pool that grows from `template`.
    #[must_use]
    pub fn new(template: impl Template<Entity = E> + 'static) -> Self {
        Self::with_config(template, &PoolConfig::default())
    }

    /// Creates a pool from a config, pre-warming its initial capacity.
    #[must_use]
    pub fn with_config(template: impl Template<Entity = E> + 'static, config: &PoolConfig) -> Self {
        let mut pool = Self {
            id: PoolId::next(),
            name: config.name.clone(),
            epoch: 0,
            slots: Vec::new(),
            free: BTreeSet::new(),
            template: Box::new(template),
            buffering: config.start_buffered,
            release_buffer: Vec::new(),
        };
        pool.set_capacity(config.initial_capacity);
        pool
    }

    /// Returns the pool's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Returns the pool's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of slots, in any state.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot has been constructed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of entities issued to callers.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len() - self.release_buffer.len()
    }

    /// Returns the number of slots ready for reuse.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns the number of released slots awaiting a flush.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.release_buffer.len()
    }

    /// Returns a snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            slots: self.len(),
            active: self.active_count(),
            free: self.free_count(),
            pending: self.pending_count(),
        }
    }

    /// Issues an entity initialized from `payload`.
    ///
    /// Grows the pool by exactly one slot if none is free. The lowest free
    /// slot is reused first.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TypeMismatch`] if the entity rejects the
    /// payload. The chosen slot stays free in that case.
    pub fn create(&mut self, payload: Payload) -> PoolResult<PoolHandle> {
        self.issue(|entity| entity.initialize_with(payload))
    }

    /// Issues an entity initialized from its own payload type.
    ///
    /// Skips the runtime type check of [`Pool::create`].
    pub fn create_typed(&mut self, payload: E::Payload) -> PoolHandle
    where
        E: TypedPoolable,
    {
        match self.issue(|entity| {
            entity.initialize(payload);
            Ok::<(), Infallible>(())
        }) {
            Ok(handle) => handle,
            Err(never) => match never {},
        }
    }

    fn issue<Err>(
        &mut self,
        init: impl FnOnce(&mut E) -> Result<(), Err>,
    ) -> Result<PoolHandle, Err> {
        let index = match self.free.first() {
            Some(&index) => index,
            None => {
                let index = self.slots.len();
                self.set_capacity(index + 1);
                index
            }
        };

        let slot = &mut self.slots[index];
        init(&mut slot.entity)?;

        self.free.remove(&index);
        slot.entity.set_active(true);
        slot.membership.set_active(true);

        tracing::trace!("Pool {}: issued slot {}", self.name, index);
        Ok(slot.membership.handle())
    }

    /// Grows the pool to at least `capacity` slots.
    ///
    /// Never shrinks. Each new slot gets a fresh, hidden entity from the
    /// template and joins the free set.
    pub fn set_capacity(&mut self, capacity: usize) {
        let current = self.slots.len();
        if current >= capacity {
            return;
        }

        self.slots.reserve(capacity - current);
        for index in current..capacity {
            let mut entity = self.template.instantiate();
            entity.set_active(false);

            self.free.insert(index);
            self.slots.push(Slot {
                entity,
                membership: Membership::bind(PoolHandle::new(self.id, self.epoch, index)),
            });
        }

        tracing::debug!("Pool {}: grown from {} to {} slots", self.name, current, capacity);
    }

    /// Returns the slot index `handle` addresses, if this pool issued it.
    fn owned_slot(&self, handle: PoolHandle) -> PoolResult<usize> {
        if handle.pool() == self.id && handle.epoch() == self.epoch && handle.slot() < self.slots.len()
        {
            Ok(handle.slot())
        } else {
            tracing::warn!("Pool {}: rejected release of {}", self.name, handle);
            Err(PoolError::Ownership {
                pool: self.id,
                what: handle.to_string(),
            })
        }
    }

    /// Returns the entity behind `handle` to the pool.
    ///
    /// The entity is hidden and deactivated immediately. Its slot becomes
    /// reusable now, or at the next [`Pool::release_from_buffer`] if the
    /// release buffer is on. Releasing an entity that is already inactive
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Ownership`] if this pool did not issue `handle`,
    /// or issued it before the last [`Pool::release_all`].
    pub fn release(&mut self, handle: PoolHandle) -> PoolResult<()> {
        let index = self.owned_slot(handle)?;
        let slot = &mut self.slots[index];
        if !slot.membership.is_active() {
            return Ok(());
        }

        if self.buffering {
            self.release_buffer.push(handle);
        } else {
            self.free.insert(index);
        }

        slot.entity.set_active(false);
        slot.membership.set_active(false);

        tracing::trace!(
            "Pool {}: released slot {} (buffered: {})",
            self.name,
            index,
            self.buffering
        );
        Ok(())
    }

    /// Like [`Pool::release`], for call sites that may hold no entity.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Ownership`] if `handle` is `None` or foreign.
    pub fn release_opt(&mut self, handle: Option<PoolHandle>) -> PoolResult<()> {
        match handle {
            Some(handle) => self.release(handle),
            None => {
                tracing::warn!("Pool {}: rejected release of a missing entity", self.name);
                Err(PoolError::Ownership {
                    pool: self.id,
                    what: String::from("a missing entity"),
                })
            }
        }
    }

    /// Hides every entity and drops all slots.
    ///
    /// Entities are discarded, not recycled. Handles issued before the
    /// reset are rejected afterwards. The release buffer's on/off state is
    /// kept.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.entity.set_active(false);
            slot.membership.set_active(false);
        }

        tracing::debug!("Pool {}: reset, {} slots discarded", self.name, self.slots.len());

        self.slots.clear();
        self.free.clear();
        self.release_buffer.clear();
        self.epoch += 1;
    }

    /// Routes subsequent releases into the release buffer.
    pub fn start_release_buffer(&mut self) {
        self.buffering = true;
    }

    /// Turns the release buffer off and frees every slot released into it.
    ///
    /// Slots are freed in release order. The flag is cleared before the
    /// buffer is drained, so any release made from here on is immediate.
    pub fn release_from_buffer(&mut self) {
        self.buffering = false;

        let mut pending = std::mem::take(&mut self.release_buffer);
        let flushed = pending.len();
        for handle in pending.drain(..) {
            self.free.insert(handle.slot());
        }
        // Keep the allocation for the next frame
        self.release_buffer = pending;

        tracing::debug!("Pool {}: flushed {} buffered releases", self.name, flushed);
    }

    /// Returns true while releases go to the release buffer.
    #[inline]
    #[must_use]
    pub const fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Returns the buffered releases, oldest first.
    #[inline]
    #[must_use]
    pub fn release_buffer(&self) -> &[PoolHandle] {
        &self.release_buffer
    }

    /// Returns true if this pool issued `handle` since its last reset.
    #[must_use]
    pub fn owns(&self, handle: PoolHandle) -> bool {
        handle.pool() == self.id && handle.epoch() == self.epoch && handle.slot() < self.slots.len()
    }

    /// Returns true if the slot behind `handle` is issued to a caller.
    #[must_use]
    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.membership(handle).is_some_and(Membership::is_active)
    }

    /// Returns true if `slot` exists and is ready for reuse.
    #[must_use]
    pub fn is_free(&self, slot: usize) -> bool {
        self.free.contains(&slot)
    }

    /// Iterates over the free slot indices, lowest first.
    pub fn free_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    /// Returns the identity of the slot behind `handle`.
    #[must_use]
    pub fn membership(&self, handle: PoolHandle) -> Option<&Membership> {
        self.owns(handle)
            .then(|| &self.slots[handle.slot()].membership)
    }

    /// Gets the entity behind `handle`, whatever its state.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&E> {
        self.owns(handle).then(|| &self.slots[handle.slot()].entity)
    }

    /// Gets the entity behind `handle` mutably, whatever its state.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut E> {
        if self.owns(handle) {
            Some(&mut self.slots[handle.slot()].entity)
        } else {
            None
        }
    }

    /// Iterates over active entities in slot order.
    pub fn iter(&self) -> ActiveIter<'_, E> {
        ActiveIter::new(self.slots.iter())
    }

    /// Iterates mutably over active entities in slot order.
    pub fn iter_mut(&mut self) -> ActiveIterMut<'_, E> {
        ActiveIterMut::new(self.slots.iter_mut())
    }

    /// Collects the handles of all active entities.
    ///
    /// The snapshot is independent of the pool, so it can drive releases.
    #[must_use]
    pub fn active_handles(&self) -> Vec<PoolHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}

impl<'a, E: Poolable> IntoIterator for &'a Pool<E> {
    type Item = (PoolHandle, &'a E);
    type IntoIter = ActiveIter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, E: Poolable> IntoIterator for &'a mut Pool<E> {
    type Item = (PoolHandle, &'a mut E);
    type IntoIter = ActiveIterMut<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<E> fmt::Debug for Pool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("epoch", &self.epoch)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .field("buffering", &self.buffering)
            .field("release_buffer", &self.release_buffer)
            .finish_non_exhaustive()
    }
}
