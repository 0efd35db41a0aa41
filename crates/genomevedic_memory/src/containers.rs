//! # Pooled Containers
//!
//! Capacity-tagged containers handed out by [`Pool`](crate::Pool).
//!
//! Storage is allocated once at the tagged capacity and never grows, so a
//! recycled container always has exactly the shape its pool expects.

use bytemuck::{Pod, Zeroable};
use genomevedic_shared::{Coordinate, Particle};

use crate::pool::Recyclable;

/// A batch of particles.
pub type ParticleSlice = RecordSlice<Particle>;

/// A batch of 3D coordinates.
pub type CoordinateSlice = RecordSlice<Coordinate>;

/// A raw byte buffer for disk to GPU staging.
pub type ByteBuffer = RecordSlice<u8>;

/// Fixed-capacity storage of Pod records with a logical length.
///
/// The whole backing store exists from construction. `len` only says how
/// much of it the current borrower has filled.
#[derive(Clone, Debug)]
pub struct RecordSlice<T> {
    data: Box<[T]>,
    len: usize,
}

impl<T: Pod> RecordSlice<T> {
    /// Creates zeroed storage for `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![<T as Zeroable>::zeroed(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Total number of records the storage holds.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of records filled.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is filled.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if no more records fit.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Records that still fit.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.len
    }

    /// Appends a record. Returns false, changing nothing, when full.
    #[inline]
    #[must_use]
    pub fn push(&mut self, value: T) -> bool {
        match self.data.get_mut(self.len) {
            Some(slot) => {
                *slot = value;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    /// Appends as many records as fit. Returns how many were copied.
    pub fn extend_from_slice(&mut self, values: &[T]) -> usize {
        let count = values.len().min(self.remaining());
        self.data[self.len..self.len + count].copy_from_slice(&values[..count]);
        self.len += count;
        count
    }

    /// Sets the logical length, clamped to capacity.
    ///
    /// Use after filling [`RecordSlice::storage_mut`] directly.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.data.len());
    }

    /// Forgets every record. Storage is not zeroed.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The filled records.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// The filled records, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.len]
    }

    /// The whole backing store, filled or not.
    #[inline]
    pub fn storage_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The filled records as raw bytes, ready for upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}

impl<T: Pod> Recyclable for RecordSlice<T> {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

/// Particle indices belonging to one voxel.
///
/// The index vector is reserved at the tagged capacity and truncated on
/// reuse, never reallocated.
#[derive(Clone, Debug)]
pub struct VoxelData {
    indices: Vec<u32>,
    capacity: usize,
}

impl VoxelData {
    /// Creates an empty container reserving `capacity` indices.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// The capacity tag.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capacity of the backing vector, at least the tag.
    #[inline]
    #[must_use]
    pub fn storage_capacity(&self) -> usize {
        self.indices.capacity()
    }

    /// Number of particles indexed.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no particles are indexed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The particle indices.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Adds a particle index. Returns false, changing nothing, at capacity.
    #[inline]
    #[must_use]
    pub fn push(&mut self, index: u32) -> bool {
        if self.indices.len() >= self.capacity {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Adds as many indices as fit. Returns how many were added.
    pub fn extend_from_slice(&mut self, indices: &[u32]) -> usize {
        let count = indices
            .len()
            .min(self.capacity.saturating_sub(self.indices.len()));
        self.indices.extend_from_slice(&indices[..count]);
        count
    }

    /// Drops every index, keeping the reservation.
    #[inline]
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

impl Recyclable for VoxelData {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}
