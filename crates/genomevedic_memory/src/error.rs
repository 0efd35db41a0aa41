//! # Memory Error Types
//!
//! Exhaustion that callers must check. Capacity mismatches on return are
//! not errors: the container is dropped instead of pooled.

use thiserror::Error;

/// Errors that can occur in the memory subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A stream buffer cannot fit another chunk.
    #[error("stream buffer full: chunk of {chunk_size} bytes, {available} bytes available")]
    StreamBufferFull {
        /// The configured chunk size.
        chunk_size: usize,
        /// Bytes left in the backing arena.
        available: usize,
    },

    /// An arena cannot fit the requested reservation.
    #[error("arena full: requested {requested} bytes, {available} bytes available")]
    ArenaFull {
        /// Bytes requested.
        requested: usize,
        /// Bytes left in the arena.
        available: usize,
    },

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The process-wide manager was already constructed.
    #[error("global memory manager already initialized")]
    AlreadyInitialized,
}

/// Result type for memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
