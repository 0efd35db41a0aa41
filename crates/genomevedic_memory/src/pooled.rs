//! # Pooled Arenas
//!
//! Reusable arenas of one fixed capacity. A checked-out arena is always
//! rewound, so the borrower starts at offset zero.

use parking_lot::Mutex;
use std::fmt;

use crate::arena::Arena;
use crate::pool::ObjectPool;
use crate::stats::ArenaPoolStats;

/// A pool of same-capacity [`Arena`]s.
///
/// # Example
///
/// ```rust
/// use genomevedic_memory::PooledArena;
///
/// let arenas = PooledArena::new(10 * 1024);
/// for _ in 0..3 {
///     let arena = arenas.get_arena();
///     let _ = arena.alloc(1024);
///     arenas.put_arena(arena);
/// }
///
/// let stats = arenas.stats();
/// assert_eq!((stats.allocations, stats.reuses), (1, 3));
/// ```
pub struct PooledArena {
    idle: Mutex<Vec<Arena>>,
    arena_size: usize,
    max_idle: usize,
    stats: Mutex<ArenaPoolStats>,
}

impl PooledArena {
    /// Creates an empty pool of arenas of `arena_size` bytes.
    #[must_use]
    pub fn new(arena_size: usize) -> Self {
        Self::with_max_idle(arena_size, usize::MAX)
    }

    /// Creates an empty pool that retains at most `max_idle` arenas.
    #[must_use]
    pub fn with_max_idle(arena_size: usize, max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            arena_size,
            max_idle,
            stats: Mutex::new(ArenaPoolStats::default()),
        }
    }

    /// Takes a rewound arena, constructing one if none is idle.
    pub fn get_arena(&self) -> Arena {
        let pooled = self.idle.lock().pop();
        let fresh = pooled.is_none();
        let arena = pooled.unwrap_or_else(|| {
            tracing::debug!(arena_size = self.arena_size, "no idle arena, allocating");
            Arena::new(self.arena_size)
        });
        arena.reset();

        let mut stats = self.stats.lock();
        if fresh {
            stats.allocations += 1;
        }
        stats.reuses += 1;

        arena
    }

    /// Returns an arena. Arenas of any other capacity are dropped.
    pub fn put_arena(&self, arena: Arena) {
        if arena.capacity() != self.arena_size {
            tracing::trace!(
                expected = self.arena_size,
                actual = arena.capacity(),
                "discarding arena with mismatched capacity"
            );
            return;
        }

        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(arena);
        }
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> ArenaPoolStats {
        *self.stats.lock()
    }

    /// Number of arenas waiting in the pool.
    #[inline]
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Capacity of every pooled arena.
    #[inline]
    #[must_use]
    pub const fn arena_size(&self) -> usize {
        self.arena_size
    }
}

impl ObjectPool for PooledArena {
    type Item = Arena;

    #[inline]
    fn get(&self) -> Arena {
        self.get_arena()
    }

    #[inline]
    fn put(&self, arena: Arena) {
        self.put_arena(arena);
    }
}

impl fmt::Debug for PooledArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledArena")
            .field("arena_size", &self.arena_size)
            .field("idle", &self.idle_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
