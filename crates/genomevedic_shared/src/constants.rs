//! # Memory Presets
//!
//! Capacities the default `MemoryManager` is wired with.
//!
//! **CRITICAL:** These values size the RAM budget of the renderer backend.
//! A 3B-particle genome is staged through these pools batch by batch, so
//! growing any of them multiplies across every worker.

// =============================================================================
// ALIGNMENT
// =============================================================================

/// Every arena reservation is rounded up to this many bytes.
pub const ARENA_ALIGNMENT: usize = 8;

// =============================================================================
// OBJECT POOLS
// =============================================================================

/// Particles per pooled particle slice (one render batch).
pub const PARTICLE_SLICE_CAPACITY: usize = 50_000;

/// Particle indices per pooled voxel container.
pub const VOXEL_INDEX_CAPACITY: usize = 1_000;

/// Bytes per pooled raw buffer (disk to GPU staging).
pub const RAW_BUFFER_SIZE: usize = 1024 * 1024;

/// Coordinates per pooled coordinate slice.
pub const COORDINATE_SLICE_CAPACITY: usize = 50_000;

// =============================================================================
// POOLED ARENAS
// =============================================================================

/// Bytes per pooled stream arena.
pub const STREAM_ARENA_SIZE: usize = 100 * 1024 * 1024;

/// Chunk size handed out by a stream buffer over a stream arena.
pub const STREAM_CHUNK_SIZE: usize = 1024 * 1024;

/// Particle records per pooled particle arena.
pub const PARTICLE_ARENA_RECORDS: usize = 50_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_chunks_divide_arena() {
        assert_eq!(STREAM_ARENA_SIZE % STREAM_CHUNK_SIZE, 0);
        assert_eq!(STREAM_CHUNK_SIZE % ARENA_ALIGNMENT, 0);
    }
}
