//! # Stream Buffer
//!
//! Hands out fixed-size chunks of one arena, in order, so a large file can be
//! pushed through memory in bounded pieces with no per-chunk heap allocation.

use parking_lot::MappedMutexGuard;

use crate::arena::{aligned_size, Arena, ArenaSpan};
use crate::error::{MemoryError, MemoryResult};

/// Sequential chunk consumer over an [`Arena`].
///
/// # Example
///
/// ```rust
/// use genomevedic_memory::StreamBuffer;
///
/// let mut stream = StreamBuffer::new(4096, 1024);
/// while let Ok(chunk) = stream.get_chunk() {
///     let mut bytes = stream.chunk_mut(chunk).expect("live chunk");
///     bytes.fill(b'N');
/// }
///
/// // Next file
/// stream.reset();
/// ```
#[derive(Debug)]
pub struct StreamBuffer {
    arena: Arena,
    chunk_size: usize,
    active_chunk: Option<ArenaSpan>,
}

impl StreamBuffer {
    /// Creates a stream buffer over a fresh arena of `total_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn new(total_size: usize, chunk_size: usize) -> Self {
        Self::from_arena(Arena::new(total_size), chunk_size)
    }

    /// Creates a stream buffer over an existing arena, typically a pooled
    /// stream arena. The arena is rewound first.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn from_arena(arena: Arena, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Chunk size must be greater than zero");
        arena.reset();
        Self {
            arena,
            chunk_size,
            active_chunk: None,
        }
    }

    /// Returns the next chunk.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::StreamBufferFull`] once the arena cannot fit
    /// another chunk. Nothing is reserved in that case.
    pub fn get_chunk(&mut self) -> MemoryResult<ArenaSpan> {
        let chunk = self
            .arena
            .alloc(self.chunk_size)
            .ok_or_else(|| MemoryError::StreamBufferFull {
                chunk_size: self.chunk_size,
                available: self.arena.available(),
            })?;
        self.active_chunk = Some(chunk);
        Ok(chunk)
    }

    /// The chunk most recently handed out since the last reset.
    #[inline]
    #[must_use]
    pub const fn active_chunk(&self) -> Option<ArenaSpan> {
        self.active_chunk
    }

    /// Locks the arena and returns the bytes of a chunk.
    #[inline]
    pub fn chunk_mut(&self, chunk: ArenaSpan) -> Option<MappedMutexGuard<'_, [u8]>> {
        self.arena.bytes_mut(chunk)
    }

    /// Rewinds for the next file.
    pub fn reset(&mut self) {
        self.arena.reset();
        self.active_chunk = None;
    }

    /// The configured chunk size in bytes.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// How many chunks fit in a rewound buffer.
    #[must_use]
    pub fn chunks_total(&self) -> usize {
        aligned_size(self.chunk_size).map_or(0, |stride| self.arena.capacity() / stride)
    }

    /// Bytes handed out so far.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.arena.used()
    }

    /// Bytes still available.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.arena.available()
    }

    /// Unwraps the underlying arena, so it can be returned to its pool.
    #[must_use]
    pub fn into_arena(self) -> Arena {
        self.arena
    }
}
