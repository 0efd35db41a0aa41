//! # Arena Allocator
//!
//! A bump allocator over one fixed-size block, for genome records that are
//! staged together and thrown away together.

use bytemuck::Pod;
use genomevedic_shared::ARENA_ALIGNMENT;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::fmt;
use std::ops::Range;

use crate::error::{MemoryError, MemoryResult};

/// Rounds `size` up to the arena alignment.
///
/// Returns `None` if the rounded size does not fit in `usize`.
#[inline]
#[must_use]
pub const fn aligned_size(size: usize) -> Option<usize> {
    match size.checked_add(ARENA_ALIGNMENT - 1) {
        Some(padded) => Some(padded & !(ARENA_ALIGNMENT - 1)),
        None => None,
    }
}

/// Handle to a byte range reserved from an [`Arena`].
///
/// The length is exactly what was requested; the alignment padding behind
/// it is arena bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaSpan {
    offset: usize,
    len: usize,
}

impl ArenaSpan {
    /// Byte offset of the span inside its arena.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns true for a zero-length span.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    const fn range(self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

struct ArenaState {
    /// Backing block, held as words so every span offset is 8-byte aligned.
    words: Box<[u64]>,
    /// Next free byte.
    offset: usize,
}

impl ArenaState {
    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }
}

/// A bump-pointer arena allocator.
///
/// Allocations only advance an offset. Nothing is freed individually; the
/// whole arena is rewound with [`Arena::reset`].
///
/// # Thread Safety
///
/// Every operation takes the arena's own lock, so an arena can be shared,
/// but a shared arena is a contention point. Give each worker its own.
///
/// # Example
///
/// ```rust
/// use genomevedic_memory::Arena;
///
/// let arena = Arena::new(1024);
/// let span = arena.alloc(100).expect("fresh arena");
/// arena.bytes_mut(span).expect("live span")[0] = 42;
///
/// // Rewind; memory is NOT zeroed
/// arena.reset();
/// assert_eq!(arena.used(), 0);
/// ```
pub struct Arena {
    state: Mutex<ArenaState>,
    capacity: usize,
}

impl Arena {
    /// Creates a new arena with the specified capacity in bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let words = capacity.div_ceil(ARENA_ALIGNMENT);
        Self {
            state: Mutex::new(ArenaState {
                words: vec![0u64; words].into_boxed_slice(),
                offset: 0,
            }),
            capacity,
        }
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the bytes reserved so far, alignment padding included.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.state.lock().offset
    }

    /// Returns the bytes still available.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity - self.used()
    }

    /// Reserves exactly `size` bytes.
    ///
    /// The reservation is rounded up to 8 bytes. Returns `None`, reserving
    /// nothing, if the rounded size does not fit in the remaining capacity.
    pub fn alloc(&self, size: usize) -> Option<ArenaSpan> {
        let reserved = aligned_size(size)?;

        let mut state = self.state.lock();
        let end = state.offset.checked_add(reserved)?;
        if end > self.capacity {
            return None;
        }

        let span = ArenaSpan {
            offset: state.offset,
            len: size,
        };
        state.offset = end;
        Some(span)
    }

    /// Like [`Arena::alloc`], but reports exhaustion as an error for `?` callers.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ArenaFull`] when the reservation does not fit.
    pub fn try_alloc(&self, size: usize) -> MemoryResult<ArenaSpan> {
        self.alloc(size).ok_or_else(|| MemoryError::ArenaFull {
            requested: size,
            available: self.available(),
        })
    }

    /// Rewinds the arena, invalidating all previous spans.
    ///
    /// Memory is not zeroed. Reused spans contain whatever was written before.
    #[inline]
    pub fn reset(&self) {
        self.state.lock().offset = 0;
    }

    /// Locks the arena and returns the bytes of a reserved span.
    ///
    /// Returns `None` if the span is not inside the currently reserved
    /// region (for example after a reset).
    pub fn bytes_mut(&self, span: ArenaSpan) -> Option<MappedMutexGuard<'_, [u8]>> {
        let range = span.range();
        if range.end > self.capacity {
            return None;
        }

        MutexGuard::try_map(self.state.lock(), |state| {
            if range.end > state.offset {
                return None;
            }
            state.bytes_mut().get_mut(range)
        })
        .ok()
    }

    /// Locks the arena and returns a reserved span reinterpreted as records.
    ///
    /// Returns `None` if the span is not live or its length is not a
    /// multiple of `size_of::<T>()`.
    pub fn records_mut<T: Pod>(&self, span: ArenaSpan) -> Option<MappedMutexGuard<'_, [T]>> {
        let bytes = self.bytes_mut(span)?;
        MappedMutexGuard::try_map(bytes, |bytes| bytemuck::try_cast_slice_mut(bytes).ok()).ok()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .finish()
    }
}
