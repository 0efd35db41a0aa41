//! # Typed Record Arenas
//!
//! Fixed-record-size views over an [`Arena`]. Counters are the arena's byte
//! counters divided by the record size.

use bytemuck::Pod;
use genomevedic_shared::{Particle, VoxelIndexEntry};
use parking_lot::MappedMutexGuard;
use std::fmt;
use std::marker::PhantomData;

use crate::arena::{Arena, ArenaSpan};

/// Arena holding particle records.
pub type ParticleArena = RecordArena<Particle>;

/// Arena holding voxel index records.
pub type VoxelArena = RecordArena<VoxelIndexEntry>;

/// An arena that hands out whole records of type `R`.
///
/// # Example
///
/// ```rust
/// use genomevedic_memory::ParticleArena;
/// use genomevedic_shared::Particle;
///
/// let arena = ParticleArena::with_capacity(1000);
/// let span = arena.alloc_records(100).expect("room for 100");
/// arena.records_mut(span).expect("live span")[0] = Particle::default();
///
/// assert_eq!(arena.used_records(), 100);
/// assert_eq!(arena.available_records(), 900);
/// ```
pub struct RecordArena<R> {
    arena: Arena,
    _record: PhantomData<fn() -> R>,
}

impl<R: Pod> RecordArena<R> {
    /// Bytes per record.
    pub const RECORD_SIZE: usize = {
        assert!(std::mem::size_of::<R>() > 0, "zero-sized records");
        std::mem::size_of::<R>()
    };

    /// Creates an arena with room for `records` records.
    #[must_use]
    pub fn with_capacity(records: usize) -> Self {
        Self::from_arena(Arena::new(records.saturating_mul(Self::RECORD_SIZE)))
    }

    /// Wraps an existing arena, typically one checked out of a pooled arena.
    #[must_use]
    pub fn from_arena(arena: Arena) -> Self {
        Self {
            arena,
            _record: PhantomData,
        }
    }

    /// Unwraps the underlying arena, so it can be returned to its pool.
    #[must_use]
    pub fn into_arena(self) -> Arena {
        self.arena
    }

    /// The wrapped arena.
    #[inline]
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Reserves `n` contiguous records.
    ///
    /// Returns `None` if they do not fit.
    #[inline]
    pub fn alloc_records(&self, n: usize) -> Option<ArenaSpan> {
        self.arena.alloc(n.checked_mul(Self::RECORD_SIZE)?)
    }

    /// Locks the arena and returns the records of a reserved span.
    #[inline]
    pub fn records_mut(&self, span: ArenaSpan) -> Option<MappedMutexGuard<'_, [R]>> {
        self.arena.records_mut(span)
    }

    /// Number of records reserved so far.
    #[inline]
    #[must_use]
    pub fn used_records(&self) -> usize {
        self.arena.used() / Self::RECORD_SIZE
    }

    /// Number of records that still fit.
    #[inline]
    #[must_use]
    pub fn available_records(&self) -> usize {
        self.arena.available() / Self::RECORD_SIZE
    }

    /// Total record capacity.
    #[inline]
    #[must_use]
    pub fn capacity_records(&self) -> usize {
        self.arena.capacity() / Self::RECORD_SIZE
    }

    /// Rewinds the arena. Records are not zeroed.
    #[inline]
    pub fn reset(&self) {
        self.arena.reset();
    }
}

impl<R> fmt::Debug for RecordArena<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordArena")
            .field("record", &std::any::type_name::<R>())
            .field("arena", &self.arena)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genomevedic_shared::{PARTICLE_RECORD_SIZE, VOXEL_RECORD_SIZE};

    #[test]
    fn test_particle_arena() {
        let arena = ParticleArena::with_capacity(1000);

        let span = arena.alloc_records(100).unwrap();
        assert_eq!(span.len(), 100 * PARTICLE_RECORD_SIZE);
        assert_eq!(arena.used_records(), 100);
        assert_eq!(arena.available_records(), 900);
        assert_eq!(arena.capacity_records(), 1000);
    }

    #[test]
    fn test_voxel_arena() {
        let arena = VoxelArena::with_capacity(1000);

        let span = arena.alloc_records(50).unwrap();
        assert_eq!(span.len(), 50 * VOXEL_RECORD_SIZE);
        assert_eq!(arena.used_records(), 50);
    }

    #[test]
    fn test_particle_arena_exhaustion() {
        let arena = ParticleArena::with_capacity(10);
        assert!(arena.alloc_records(11).is_none());
        assert!(arena.alloc_records(10).is_some());
        assert!(arena.alloc_records(1).is_none());
        assert_eq!(arena.available_records(), 0);

        arena.reset();
        assert_eq!(arena.used_records(), 0);
        assert_eq!(arena.available_records(), 10);
    }

    #[test]
    fn test_records_written_in_place() {
        let arena = ParticleArena::with_capacity(4);
        let span = arena.alloc_records(2).unwrap();
        {
            let mut particles = arena.records_mut(span).unwrap();
            assert_eq!(particles.len(), 2);
            particles[1] = Particle::new([1.0, 2.0, 3.0], [1.0; 4], 0.5, 42);
        }

        let particles = arena.records_mut(span).unwrap();
        assert_eq!(particles[1].metadata, 42);
    }

    #[test]
    fn test_wraps_foreign_arena() {
        let arena = VoxelArena::from_arena(Arena::new(VOXEL_RECORD_SIZE * 3 + 5));
        assert_eq!(arena.capacity_records(), 3);
        let inner = arena.into_arena();
        assert_eq!(inner.capacity(), VOXEL_RECORD_SIZE * 3 + 5);
    }
}
