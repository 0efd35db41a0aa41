//! # Memory Configuration
//!
//! Pool and arena sizes for a [`MemoryManager`](crate::MemoryManager).
//!
//! Hosts usually keep these under a `[memory]` table in their own TOML file
//! and pass the table text to [`MemoryConfig::from_toml_str`]. Missing keys
//! fall back to the production presets.

use genomevedic_shared::{
    COORDINATE_SLICE_CAPACITY, PARTICLE_ARENA_RECORDS, PARTICLE_RECORD_SIZE,
    PARTICLE_SLICE_CAPACITY, RAW_BUFFER_SIZE, STREAM_ARENA_SIZE, STREAM_CHUNK_SIZE,
    VOXEL_INDEX_CAPACITY,
};
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// Sizes of every pool and arena the manager owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Particles per pooled particle slice.
    pub particle_slice_capacity: usize,
    /// Indices per pooled voxel container.
    pub voxel_index_capacity: usize,
    /// Bytes per pooled raw buffer.
    pub buffer_size: usize,
    /// Coordinates per pooled coordinate slice.
    pub coordinate_capacity: usize,
    /// Bytes per pooled stream arena.
    pub stream_arena_size: usize,
    /// Chunk size for stream buffers built on pooled stream arenas.
    pub stream_chunk_size: usize,
    /// Particle records per pooled particle arena.
    pub particle_arena_records: usize,
    /// Retention bound applied to every pool. `None` keeps everything.
    pub max_idle: Option<usize>,
    /// Containers allocated up front in each container pool.
    pub prewarm_containers: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            particle_slice_capacity: PARTICLE_SLICE_CAPACITY,
            voxel_index_capacity: VOXEL_INDEX_CAPACITY,
            buffer_size: RAW_BUFFER_SIZE,
            coordinate_capacity: COORDINATE_SLICE_CAPACITY,
            stream_arena_size: STREAM_ARENA_SIZE,
            stream_chunk_size: STREAM_CHUNK_SIZE,
            particle_arena_records: PARTICLE_ARENA_RECORDS,
            max_idle: None,
            prewarm_containers: 0,
        }
    }
}

impl MemoryConfig {
    /// Small sizes for tests and memory-constrained hosts.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            particle_slice_capacity: 1024,
            voxel_index_capacity: 64,
            buffer_size: 64 * 1024,
            coordinate_capacity: 1024,
            stream_arena_size: 1024 * 1024,
            stream_chunk_size: 64 * 1024,
            particle_arena_records: 1024,
            max_idle: Some(16),
            prewarm_containers: 0,
        }
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] if the text does not parse,
    /// names an unknown key, or fails [`MemoryConfig::validate`].
    pub fn from_toml_str(text: &str) -> MemoryResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MemoryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every size is usable.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> MemoryResult<()> {
        let sizes = [
            ("particle_slice_capacity", self.particle_slice_capacity),
            ("voxel_index_capacity", self.voxel_index_capacity),
            ("buffer_size", self.buffer_size),
            ("coordinate_capacity", self.coordinate_capacity),
            ("stream_arena_size", self.stream_arena_size),
            ("stream_chunk_size", self.stream_chunk_size),
            ("particle_arena_records", self.particle_arena_records),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(MemoryError::InvalidConfig(format!(
                "{name} must be greater than zero"
            )));
        }

        if self.stream_chunk_size > self.stream_arena_size {
            return Err(MemoryError::InvalidConfig(format!(
                "stream_chunk_size ({}) exceeds stream_arena_size ({})",
                self.stream_chunk_size, self.stream_arena_size
            )));
        }

        if self
            .particle_arena_records
            .checked_mul(PARTICLE_RECORD_SIZE)
            .is_none()
        {
            return Err(MemoryError::InvalidConfig(format!(
                "particle_arena_records ({}) overflows the arena size",
                self.particle_arena_records
            )));
        }

        Ok(())
    }

    /// Bytes per pooled particle arena.
    ///
    /// Saturates on overflow; [`MemoryConfig::validate`] rejects such configs.
    #[inline]
    #[must_use]
    pub const fn particle_arena_size(&self) -> usize {
        self.particle_arena_records
            .saturating_mul(PARTICLE_RECORD_SIZE)
    }

    /// The retention bound as a pool argument.
    #[inline]
    #[must_use]
    pub(crate) fn max_idle_or_unbounded(&self) -> usize {
        self.max_idle.unwrap_or(usize::MAX)
    }
}
