//! # Pool Membership
//!
//! Identity a pool assigns to each entity it manages:
//! - The owning pool
//! - The slot index (fixed for the life of the slot)
//! - Whether the entity is currently issued to a caller
//!
//! Everything here is readable by anyone, but only the pool can write it.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use super::Poolable;
use crate::error::PoolResult;
use crate::pool::Pool;

/// Unique identifier for a pool.
///
/// Allocated from a process-wide counter when the pool is built, so two
/// pools never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PoolId(u32);

impl PoolId {
    /// Allocates the next unused pool id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an entity issued by a pool.
///
/// Handles are plain values: copying one does not extend the entity's
/// lifetime. The epoch is bumped by every full reset, which turns handles
/// from before the reset into foreign handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    pool: PoolId,
    epoch: u64,
    slot: usize,
}

impl PoolHandle {
    #[inline]
    pub(crate) const fn new(pool: PoolId, epoch: u64, slot: usize) -> Self {
        Self { pool, epoch, slot }
    }

    /// Returns the id of the pool that issued this handle.
    #[inline]
    #[must_use]
    pub const fn pool(self) -> PoolId {
        self.pool
    }

    /// Returns the slot index this handle refers to.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot
    }

    /// Returns the reset epoch the handle was issued in.
    #[inline]
    #[must_use]
    pub const fn epoch(self) -> u64 {
        self.epoch
    }

    /// Releases the entity behind this handle back to its pool.
    ///
    /// Convenience for `pool.release(handle)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Ownership`](crate::PoolError::Ownership) if
    /// `pool` did not issue this handle.
    pub fn release_from<E: Poolable>(self, pool: &mut Pool<E>) -> PoolResult<()> {
        pool.release(self)
    }
}

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot {} of pool {} (epoch {})",
            self.slot, self.pool, self.epoch
        )
    }
}

/// Pool-assigned identity of one slot.
///
/// Read-only outside the crate. The pool is the sole writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Membership {
    handle: PoolHandle,
    active: bool,
}

impl Membership {
    /// Binds a freshly constructed entity to its slot, inactive.
    #[inline]
    pub(crate) const fn bind(handle: PoolHandle) -> Self {
        Self {
            handle,
            active: false,
        }
    }

    #[inline]
    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns the owning pool.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.handle.pool
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.handle.slot
    }

    /// Returns true while the entity is issued to a caller.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the handle that addresses this slot.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> PoolHandle {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_ids_are_unique() {
        let a = PoolId::next();
        let b = PoolId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_membership_binds_inactive() {
        let id = PoolId::next();
        let mut m = Membership::bind(PoolHandle::new(id, 0, 7));
        assert_eq!(m.pool(), id);
        assert_eq!(m.slot(), 7);
        assert!(!m.is_active());

        m.set_active(true);
        assert!(m.is_active());
        assert_eq!(m.handle().slot(), 7);
    }

    #[test]
    fn test_handle_display() {
        let id = PoolId::next();
        let handle = PoolHandle::new(id, 2, 5);
        assert_eq!(handle.to_string(), format!("slot 5 of pool #{} (epoch 2)", id.get()));
    }
}
