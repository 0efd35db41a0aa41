//! # Scoped Checkout
//!
//! A guard that returns its item to the pool it came from when dropped, so
//! an early return cannot leak a container.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::pool::ObjectPool;

// Only `detach` and `drop` take the item, and both consume the guard.
const PRESENT: &str = "pooled item is present until detached or dropped";

/// An item checked out of an [`ObjectPool`].
///
/// Dereferences to the item. Dropping the guard puts the item back;
/// [`Pooled::detach`] keeps it instead.
pub struct Pooled<'a, T> {
    item: Option<T>,
    pool: &'a dyn ObjectPool<Item = T>,
}

impl<'a, T> Pooled<'a, T> {
    /// Takes an item out of `pool`.
    pub fn new(pool: &'a dyn ObjectPool<Item = T>) -> Self {
        Self {
            item: Some(pool.get()),
            pool,
        }
    }

    /// Takes ownership of the item. It will not go back to the pool
    /// unless the caller puts it there.
    #[must_use]
    pub fn detach(mut self) -> T {
        self.item.take().expect(PRESENT)
    }

    #[inline]
    fn item(&self) -> &T {
        self.item.as_ref().expect(PRESENT)
    }

    #[inline]
    fn item_mut(&mut self) -> &mut T {
        self.item.as_mut().expect(PRESENT)
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.item()
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        self.item_mut()
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.put(item);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.item).finish()
    }
}
