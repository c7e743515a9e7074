//! Iterators over the active entities of a pool.

use std::iter::FusedIterator;
use std::slice;

use super::Slot;
use crate::entity::PoolHandle;

/// Iterator over active entities, in slot order.
///
/// Created by [`Pool::iter`](super::Pool::iter).
pub struct ActiveIter<'a, E> {
    slots: slice::Iter<'a, Slot<E>>,
}

impl<'a, E> ActiveIter<'a, E> {
    pub(super) fn new(slots: slice::Iter<'a, Slot<E>>) -> Self {
        Self { slots }
    }
}

impl<'a, E> Iterator for ActiveIter<'a, E> {
    type Item = (PoolHandle, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find(|slot| slot.membership.is_active())
            .map(|slot| (slot.membership.handle(), &slot.entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<E> FusedIterator for ActiveIter<'_, E> {}

/// Mutable iterator over active entities, in slot order.
///
/// Created by [`Pool::iter_mut`](super::Pool::iter_mut).
pub struct ActiveIterMut<'a, E> {
    slots: slice::IterMut<'a, Slot<E>>,
}

impl<'a, E> ActiveIterMut<'a, E> {
    pub(super) fn new(slots: slice::IterMut<'a, Slot<E>>) -> Self {
        Self { slots }
    }
}

impl<'a, E> Iterator for ActiveIterMut<'a, E> {
    type Item = (PoolHandle, &'a mut E);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find(|slot| slot.membership.is_active())
            .map(|slot| (slot.membership.handle(), &mut slot.entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<E> FusedIterator for ActiveIterMut<'_, E> {}
