//! # GenomeVedic Memory
//!
//! Arena allocators and object pools for staging genome particles between
//! disk, parsers and the GPU.
//!
//! ## Architecture Rules
//!
//! 1. **Allocate once** - arenas and pooled containers are sized up front
//! 2. **Exhaustion is a value** - a full arena returns `None`, a full stream
//!    buffer returns `Err`, nothing panics
//! 3. **Exact-capacity pooling** - a container only rejoins the pool it fits
//!
//! ## Example
//!
//! ```rust,ignore
//! use genomevedic_memory::{MemoryConfig, MemoryManager};
//!
//! let manager = MemoryManager::from_config(&MemoryConfig::default())?;
//!
//! let mut stream = manager.get_stream_buffer();
//! while let Ok(chunk) = stream.get_chunk() {
//!     reader.read_exact(&mut stream.chunk_mut(chunk).unwrap())?;
//! }
//! manager.put_stream_buffer(stream);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod arena;
pub mod config;
pub mod containers;
pub mod error;
pub mod guard;
pub mod manager;
pub mod monitored;
pub mod pool;
pub mod pooled;
pub mod stats;
pub mod stream;
pub mod typed;

pub use arena::{aligned_size, Arena, ArenaSpan};
pub use config::MemoryConfig;
pub use containers::{ByteBuffer, CoordinateSlice, ParticleSlice, RecordSlice, VoxelData};
pub use error::{MemoryError, MemoryResult};
pub use guard::Pooled;
pub use manager::{global, init_global, MemoryManager};
pub use monitored::MonitoredPool;
pub use pool::{BufferPool, CoordinatePool, ObjectPool, ParticlePool, Pool, Recyclable, VoxelPool};
pub use pooled::PooledArena;
pub use stats::{format_bytes, ArenaPoolStats, IdleCounts, MemoryStats, PoolStats};
pub use stream::StreamBuffer;
pub use typed::{ParticleArena, RecordArena, VoxelArena};
