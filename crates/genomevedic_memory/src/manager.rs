//! # Memory Manager
//!
//! One pool of each kind, sized from a [`MemoryConfig`], plus the
//! process-wide instance for hosts that want a single shared manager.
//!
//! ## Ownership
//!
//! ```text
//! MemoryManager
//! ├── particle slices    MonitoredPool<ParticlePool>
//! ├── voxel containers   VoxelPool
//! ├── raw buffers        BufferPool
//! ├── coordinate slices  CoordinatePool
//! ├── stream arenas      PooledArena  -> StreamBuffer
//! └── particle arenas    PooledArena  -> ParticleArena
//! ```
//!
//! Explicit construction is the normal path: parsers and the streaming grid
//! receive a `&MemoryManager`. [`global`] exists for call sites that cannot
//! thread one through.

use genomevedic_shared::{COORDINATE_RECORD_SIZE, PARTICLE_RECORD_SIZE};
use std::sync::OnceLock;

use crate::arena::Arena;
use crate::config::MemoryConfig;
use crate::containers::{ByteBuffer, CoordinateSlice, ParticleSlice, VoxelData};
use crate::error::{MemoryError, MemoryResult};
use crate::guard::Pooled;
use crate::monitored::MonitoredPool;
use crate::pool::{BufferPool, CoordinatePool, ObjectPool, ParticlePool, VoxelPool};
use crate::pooled::PooledArena;
use crate::stats::{IdleCounts, MemoryStats};
use crate::stream::StreamBuffer;
use crate::typed::ParticleArena;

static GLOBAL: OnceLock<MemoryManager> = OnceLock::new();

/// Owns every pool and arena pool the renderer stages data through.
#[derive(Debug)]
pub struct MemoryManager {
    config: MemoryConfig,
    particle_pool: MonitoredPool<ParticlePool>,
    voxel_pool: VoxelPool,
    buffer_pool: BufferPool,
    coord_pool: CoordinatePool,
    stream_arenas: PooledArena,
    particle_arenas: PooledArena,
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryManager {
    /// Creates a manager with the production presets.
    ///
    /// Pools start empty; nothing large is allocated until first use.
    #[must_use]
    pub fn new() -> Self {
        Self::build(MemoryConfig::default())
    }

    /// Creates a manager from a config.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] if the config fails validation.
    pub fn from_config(config: &MemoryConfig) -> MemoryResult<Self> {
        config.validate()?;
        Ok(Self::build(config.clone()))
    }

    fn build(config: MemoryConfig) -> Self {
        let max_idle = config.max_idle_or_unbounded();
        let manager = Self {
            particle_pool: MonitoredPool::new(ParticlePool::with_max_idle(
                config.particle_slice_capacity,
                max_idle,
            )),
            voxel_pool: VoxelPool::with_max_idle(config.voxel_index_capacity, max_idle),
            buffer_pool: BufferPool::with_max_idle(config.buffer_size, max_idle),
            coord_pool: CoordinatePool::with_max_idle(config.coordinate_capacity, max_idle),
            stream_arenas: PooledArena::with_max_idle(config.stream_arena_size, max_idle),
            particle_arenas: PooledArena::with_max_idle(config.particle_arena_size(), max_idle),
            config,
        };

        let prewarm = manager.config.prewarm_containers;
        if prewarm > 0 {
            manager.particle_pool.inner().prewarm(prewarm);
            manager.voxel_pool.prewarm(prewarm);
            manager.buffer_pool.prewarm(prewarm);
            manager.coord_pool.prewarm(prewarm);
        }

        tracing::info!(
            particle_slice_capacity = manager.config.particle_slice_capacity,
            stream_arena_size = manager.config.stream_arena_size,
            particle_arena_records = manager.config.particle_arena_records,
            prewarm,
            "memory manager initialized"
        );

        manager
    }

    /// The config this manager was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    /// Takes a particle slice.
    pub fn get_particle_slice(&self) -> ParticleSlice {
        self.particle_pool.get()
    }

    /// Returns a particle slice.
    pub fn put_particle_slice(&self, slice: ParticleSlice) {
        self.particle_pool.put(slice);
    }

    /// Takes a particle slice that is returned on drop.
    pub fn checkout_particle_slice(&self) -> Pooled<'_, ParticleSlice> {
        self.particle_pool.checkout()
    }

    /// Takes a voxel index container.
    pub fn get_voxel_data(&self) -> VoxelData {
        self.voxel_pool.get()
    }

    /// Returns a voxel index container.
    pub fn put_voxel_data(&self, voxel: VoxelData) {
        self.voxel_pool.put(voxel);
    }

    /// Takes a voxel index container that is returned on drop.
    pub fn checkout_voxel_data(&self) -> Pooled<'_, VoxelData> {
        self.voxel_pool.checkout()
    }

    /// Takes a raw buffer.
    pub fn get_buffer(&self) -> ByteBuffer {
        self.buffer_pool.get()
    }

    /// Returns a raw buffer.
    pub fn put_buffer(&self, buffer: ByteBuffer) {
        self.buffer_pool.put(buffer);
    }

    /// Takes a raw buffer that is returned on drop.
    pub fn checkout_buffer(&self) -> Pooled<'_, ByteBuffer> {
        self.buffer_pool.checkout()
    }

    /// Takes a coordinate slice.
    pub fn get_coordinates(&self) -> CoordinateSlice {
        self.coord_pool.get()
    }

    /// Returns a coordinate slice.
    pub fn put_coordinates(&self, coords: CoordinateSlice) {
        self.coord_pool.put(coords);
    }

    /// Takes a coordinate slice that is returned on drop.
    pub fn checkout_coordinates(&self) -> Pooled<'_, CoordinateSlice> {
        self.coord_pool.checkout()
    }

    // ------------------------------------------------------------------
    // Arenas
    // ------------------------------------------------------------------

    /// Takes a rewound stream arena.
    pub fn get_stream_arena(&self) -> Arena {
        self.stream_arenas.get_arena()
    }

    /// Returns a stream arena.
    pub fn put_stream_arena(&self, arena: Arena) {
        self.stream_arenas.put_arena(arena);
    }

    /// Takes a stream arena that is returned on drop.
    pub fn checkout_stream_arena(&self) -> Pooled<'_, Arena> {
        self.stream_arenas.checkout()
    }

    /// Takes a stream arena wrapped as a [`StreamBuffer`] with the
    /// configured chunk size.
    pub fn get_stream_buffer(&self) -> StreamBuffer {
        StreamBuffer::from_arena(self.get_stream_arena(), self.config.stream_chunk_size)
    }

    /// Returns the arena behind a stream buffer.
    pub fn put_stream_buffer(&self, stream: StreamBuffer) {
        self.put_stream_arena(stream.into_arena());
    }

    /// Takes a rewound particle arena.
    pub fn get_particle_arena(&self) -> Arena {
        self.particle_arenas.get_arena()
    }

    /// Returns a particle arena.
    pub fn put_particle_arena(&self, arena: Arena) {
        self.particle_arenas.put_arena(arena);
    }

    /// Takes a particle arena that is returned on drop.
    pub fn checkout_particle_arena(&self) -> Pooled<'_, Arena> {
        self.particle_arenas.checkout()
    }

    /// Takes a particle arena wrapped for whole-record allocation.
    pub fn get_particle_record_arena(&self) -> ParticleArena {
        ParticleArena::from_arena(self.get_particle_arena())
    }

    /// Returns the arena behind a particle record arena.
    pub fn put_particle_record_arena(&self, arena: ParticleArena) {
        self.put_particle_arena(arena.into_arena());
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// The monitored particle slice pool.
    #[inline]
    #[must_use]
    pub const fn particle_pool(&self) -> &MonitoredPool<ParticlePool> {
        &self.particle_pool
    }

    /// The voxel container pool.
    #[inline]
    #[must_use]
    pub const fn voxel_pool(&self) -> &VoxelPool {
        &self.voxel_pool
    }

    /// The raw buffer pool.
    #[inline]
    #[must_use]
    pub const fn buffer_pool(&self) -> &BufferPool {
        &self.buffer_pool
    }

    /// The coordinate slice pool.
    #[inline]
    #[must_use]
    pub const fn coordinate_pool(&self) -> &CoordinatePool {
        &self.coord_pool
    }

    /// The stream arena pool.
    #[inline]
    #[must_use]
    pub const fn stream_arenas(&self) -> &PooledArena {
        &self.stream_arenas
    }

    /// The particle arena pool.
    #[inline]
    #[must_use]
    pub const fn particle_arenas(&self) -> &PooledArena {
        &self.particle_arenas
    }

    /// Snapshot of every counter and idle count.
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        let idle = IdleCounts {
            particle_slices: self.particle_pool.inner().idle_count(),
            voxel_data: self.voxel_pool.idle_count(),
            buffers: self.buffer_pool.idle_count(),
            coordinates: self.coord_pool.idle_count(),
            stream_arenas: self.stream_arenas.idle_count(),
            particle_arenas: self.particle_arenas.idle_count(),
        };

        let config = &self.config;
        let retained_bytes = [
            retained(
                idle.particle_slices,
                config.particle_slice_capacity.saturating_mul(PARTICLE_RECORD_SIZE),
            ),
            retained(
                idle.voxel_data,
                config.voxel_index_capacity.saturating_mul(std::mem::size_of::<u32>()),
            ),
            retained(idle.buffers, config.buffer_size),
            retained(
                idle.coordinates,
                config.coordinate_capacity.saturating_mul(COORDINATE_RECORD_SIZE),
            ),
            retained(idle.stream_arenas, config.stream_arena_size),
            retained(idle.particle_arenas, config.particle_arena_size()),
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add);

        MemoryStats {
            particle_pool: self.particle_pool.stats(),
            stream_arena: self.stream_arenas.stats(),
            particle_arena: self.particle_arenas.stats(),
            idle,
            retained_bytes,
        }
    }
}

fn retained(count: usize, bytes_each: usize) -> u64 {
    u64::try_from(count.saturating_mul(bytes_each)).unwrap_or(u64::MAX)
}

/// The process-wide manager, built with the production presets on first use.
///
/// Concurrent first callers all observe the same instance. It lives until
/// the process exits.
pub fn global() -> &'static MemoryManager {
    GLOBAL.get_or_init(MemoryManager::new)
}

/// Installs a configured process-wide manager.
///
/// Must run before the first [`global`] call.
///
/// # Errors
///
/// Returns [`MemoryError::InvalidConfig`] if the config fails validation, or
/// [`MemoryError::AlreadyInitialized`] if the global manager already exists.
pub fn init_global(config: &MemoryConfig) -> MemoryResult<&'static MemoryManager> {
    if GLOBAL.get().is_some() {
        return Err(MemoryError::AlreadyInitialized);
    }

    let manager = MemoryManager::from_config(config)?;
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        manager
    });

    if installed {
        Ok(global)
    } else {
        Err(MemoryError::AlreadyInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genomevedic_shared::Particle;

    fn compact() -> MemoryManager {
        MemoryManager::from_config(&MemoryConfig::compact()).expect("compact config is valid")
    }

    #[test]
    fn test_default_presets() {
        let manager = MemoryManager::new();
        assert_eq!(manager.particle_pool().inner().capacity(), 50_000);
        assert_eq!(manager.voxel_pool().capacity(), 1_000);
        assert_eq!(manager.buffer_pool().capacity(), 1024 * 1024);
        assert_eq!(manager.coordinate_pool().capacity(), 50_000);
        assert_eq!(manager.stream_arenas().arena_size(), 100 * 1024 * 1024);
        assert_eq!(manager.particle_arenas().arena_size(), 50_000 * 40);
        assert_eq!(manager.stats(), MemoryStats::default());
    }

    #[test]
    fn test_container_round_trips() {
        let manager = compact();

        let mut particles = manager.get_particle_slice();
        assert!(particles.push(Particle::default()));
        manager.put_particle_slice(particles);
        assert!(manager.get_particle_slice().is_empty());

        let mut voxel = manager.get_voxel_data();
        assert!(voxel.push(42));
        manager.put_voxel_data(voxel);
        assert_eq!(manager.get_voxel_data().count(), 0);

        let mut buffer = manager.get_buffer();
        buffer.set_len(128);
        manager.put_buffer(buffer);
        assert_eq!(manager.get_buffer().capacity(), 64 * 1024);

        let coords = manager.get_coordinates();
        assert_eq!(coords.capacity(), 1024);
        manager.put_coordinates(coords);
        assert_eq!(manager.stats().idle.coordinates, 1);
    }

    #[test]
    fn test_particle_pool_is_monitored() {
        let manager = compact();
        for _ in 0..3 {
            let slice = manager.get_particle_slice();
            manager.put_particle_slice(slice);
        }
        let stats = manager.stats();
        assert_eq!(stats.particle_pool.gets, 3);
        assert_eq!(stats.particle_pool.puts, 3);
        assert_eq!(stats.particle_pool.reuses, 3);
    }

    #[test]
    fn test_stream_buffer_from_pool() {
        let manager = compact();

        let mut stream = manager.get_stream_buffer();
        assert_eq!(stream.chunk_size(), 64 * 1024);
        assert_eq!(stream.chunks_total(), 16);
        for _ in 0..16 {
            assert!(stream.get_chunk().is_ok());
        }
        assert!(stream.get_chunk().is_err());
        manager.put_stream_buffer(stream);

        let mut stream = manager.get_stream_buffer();
        assert_eq!(stream.used(), 0);
        assert!(stream.get_chunk().is_ok());
        manager.put_stream_buffer(stream);

        let stats = manager.stats().stream_arena;
        assert_eq!((stats.allocations, stats.reuses), (1, 2));
    }

    #[test]
    fn test_particle_record_arena_from_pool() {
        let manager = compact();

        let arena = manager.get_particle_record_arena();
        assert_eq!(arena.capacity_records(), 1024);
        let span = arena.alloc_records(10).expect("room for 10");
        assert_eq!(span.len(), 400);
        manager.put_particle_record_arena(arena);

        let arena = manager.get_particle_arena();
        assert_eq!(arena.used(), 0);
        manager.put_particle_arena(arena);
        assert_eq!(manager.stats().particle_arena.allocations, 1);
    }

    #[test]
    fn test_scoped_checkouts_return() {
        let manager = compact();
        {
            let _particles = manager.checkout_particle_slice();
            let _voxel = manager.checkout_voxel_data();
            let _buffer = manager.checkout_buffer();
            let _coords = manager.checkout_coordinates();
            let _stream = manager.checkout_stream_arena();
            let _particle_arena = manager.checkout_particle_arena();
        }

        let idle = manager.stats().idle;
        assert_eq!(
            idle,
            IdleCounts {
                particle_slices: 1,
                voxel_data: 1,
                buffers: 1,
                coordinates: 1,
                stream_arenas: 1,
                particle_arenas: 1,
            }
        );
    }

    #[test]
    fn test_retained_bytes() {
        let manager = compact();
        let buffer = manager.get_buffer();
        manager.put_buffer(buffer);
        let arena = manager.get_stream_arena();
        manager.put_stream_arena(arena);

        assert_eq!(manager.stats().retained_bytes, 64 * 1024 + 1024 * 1024);
    }

    #[test]
    fn test_prewarm_fills_container_pools() {
        let config = MemoryConfig {
            prewarm_containers: 2,
            ..MemoryConfig::compact()
        };
        let manager = MemoryManager::from_config(&config).expect("valid config");
        let idle = manager.stats().idle;
        assert_eq!(idle.particle_slices, 2);
        assert_eq!(idle.voxel_data, 2);
        assert_eq!(idle.buffers, 2);
        assert_eq!(idle.coordinates, 2);
        assert_eq!(idle.stream_arenas, 0);
    }

    #[test]
    fn test_max_idle_applies_to_every_pool() {
        let config = MemoryConfig {
            max_idle: Some(1),
            ..MemoryConfig::compact()
        };
        let manager = MemoryManager::from_config(&config).expect("valid config");
        let a = manager.get_voxel_data();
        let b = manager.get_voxel_data();
        manager.put_voxel_data(a);
        manager.put_voxel_data(b);
        assert_eq!(manager.stats().idle.voxel_data, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MemoryConfig {
            voxel_index_capacity: 0,
            ..MemoryConfig::compact()
        };
        assert!(matches!(
            MemoryManager::from_config(&config),
            Err(MemoryError::InvalidConfig(_))
        ));
    }
}
