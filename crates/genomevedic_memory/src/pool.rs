//! # Object Pools
//!
//! Fixed-capacity container recycling for the render staging path.
//!
//! Every pool is keyed by one capacity. A container comes back into the pool
//! only if its capacity matches exactly; anything else is dropped so a
//! wrong-sized container can never be handed to the next borrower.

use parking_lot::Mutex;
use std::fmt;

use crate::containers::{ByteBuffer, CoordinateSlice, ParticleSlice, VoxelData};
use crate::guard::Pooled;

/// Pool of particle slices.
pub type ParticlePool = Pool<ParticleSlice>;

/// Pool of voxel index containers.
pub type VoxelPool = Pool<VoxelData>;

/// Pool of raw byte buffers.
pub type BufferPool = Pool<ByteBuffer>;

/// Pool of coordinate slices.
pub type CoordinatePool = Pool<CoordinateSlice>;

/// Anything that lends out items and takes them back.
///
/// Implemented by [`Pool`], [`PooledArena`](crate::PooledArena) and the
/// [`MonitoredPool`](crate::MonitoredPool) decorator.
pub trait ObjectPool {
    /// The pooled item.
    type Item;

    /// Takes an item out of the pool, creating one if the pool is empty.
    fn get(&self) -> Self::Item;

    /// Returns an item. Items that do not belong to this pool are dropped.
    fn put(&self, item: Self::Item);

    /// Takes an item that goes back to the pool when the guard is dropped.
    fn checkout(&self) -> Pooled<'_, Self::Item>
    where
        Self: Sized,
    {
        Pooled::new(self)
    }
}

/// A container that can be pooled.
pub trait Recyclable {
    /// Creates a container with the given capacity.
    fn with_capacity(capacity: usize) -> Self;

    /// The capacity tag the pool matches against.
    fn capacity(&self) -> usize;

    /// Resets the logical length. Backing storage is kept as is.
    fn recycle(&mut self);
}

/// A thread-safe pool of same-capacity containers.
///
/// # Example
///
/// ```rust
/// use genomevedic_memory::{ObjectPool, ParticlePool};
///
/// let pool = ParticlePool::new(1000);
/// {
///     let mut batch = pool.checkout();
///     batch.set_len(100);
/// } // returned here
///
/// assert_eq!(pool.idle_count(), 1);
/// assert!(pool.get().is_empty());
/// ```
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    capacity: usize,
    max_idle: usize,
}

impl<T: Recyclable> Pool<T> {
    /// Creates an empty pool of containers with the given capacity.
    ///
    /// The pool retains every returned container.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_max_idle(capacity, usize::MAX)
    }

    /// Creates an empty pool that retains at most `max_idle` containers.
    #[must_use]
    pub fn with_max_idle(capacity: usize, max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            capacity,
            max_idle,
        }
    }

    /// Takes a container with length zero.
    ///
    /// Reused containers keep their storage, including stale contents.
    pub fn get(&self) -> T {
        let reused = self.idle.lock().pop();
        match reused {
            Some(mut item) => {
                item.recycle();
                item
            }
            None => {
                tracing::debug!(
                    capacity = self.capacity,
                    container = std::any::type_name::<T>(),
                    "pool empty, allocating container"
                );
                T::with_capacity(self.capacity)
            }
        }
    }

    /// Returns a container.
    ///
    /// Dropped instead of pooled if its capacity differs from the pool's or
    /// the pool already retains `max_idle` containers.
    pub fn put(&self, mut item: T) {
        if item.capacity() != self.capacity {
            tracing::trace!(
                expected = self.capacity,
                actual = item.capacity(),
                "discarding container with mismatched capacity"
            );
            return;
        }

        item.recycle();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }

    /// Allocates up to `count` containers ahead of time.
    ///
    /// Returns how many were added.
    pub fn prewarm(&self, count: usize) -> usize {
        let mut added = 0;
        while added < count && self.idle_count() < self.max_idle {
            let item = T::with_capacity(self.capacity);
            let mut idle = self.idle.lock();
            if idle.len() >= self.max_idle {
                break;
            }
            idle.push(item);
            added += 1;
        }
        added
    }

    /// Number of containers waiting in the pool.
    #[inline]
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// The capacity every pooled container has.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The retention bound.
    #[inline]
    #[must_use]
    pub const fn max_idle(&self) -> usize {
        self.max_idle
    }
}

impl<T: Recyclable> ObjectPool for Pool<T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        Pool::get(self)
    }

    #[inline]
    fn put(&self, item: T) {
        Pool::put(self, item);
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("container", &std::any::type_name::<T>())
            .field("capacity", &self.capacity)
            .field("idle", &self.idle.lock().len())
            .finish_non_exhaustive()
    }
}
