//! # Memory Statistics
//!
//! Counter snapshots for pools and pooled arenas, plus the aggregate report
//! the manager renders for the monitoring endpoint.

use serde::Serialize;
use std::fmt;

/// Counters kept by a [`MonitoredPool`](crate::MonitoredPool).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Calls to `get`.
    pub gets: u64,
    /// Calls to `put`.
    pub puts: u64,
    /// Containers handed back, whether or not the pool kept them.
    pub reuses: u64,
}

/// Counters kept by a [`PooledArena`](crate::PooledArena).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArenaPoolStats {
    /// Arenas that had to be constructed.
    pub allocations: u64,
    /// Checkouts, including the first checkout of a fresh arena.
    pub reuses: u64,
}

impl ArenaPoolStats {
    /// Checkouts served by an idle arena.
    #[inline]
    #[must_use]
    pub const fn cache_hits(&self) -> u64 {
        self.reuses.saturating_sub(self.allocations)
    }
}

/// Containers and arenas currently waiting in each pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IdleCounts {
    /// Idle particle slices.
    pub particle_slices: usize,
    /// Idle voxel index containers.
    pub voxel_data: usize,
    /// Idle raw buffers.
    pub buffers: usize,
    /// Idle coordinate slices.
    pub coordinates: usize,
    /// Idle stream arenas.
    pub stream_arenas: usize,
    /// Idle particle arenas.
    pub particle_arenas: usize,
}

/// Snapshot of everything a `MemoryManager` tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// Particle slice pool counters.
    pub particle_pool: PoolStats,
    /// Stream arena pool counters.
    pub stream_arena: ArenaPoolStats,
    /// Particle arena pool counters.
    pub particle_arena: ArenaPoolStats,
    /// Idle counts per pool.
    pub idle: IdleCounts,
    /// Bytes held by idle containers and arenas.
    pub retained_bytes: u64,
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory Pool Report")?;
        writeln!(f, "==================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Particle slices:  {} gets, {} puts, {} reuses",
            self.particle_pool.gets, self.particle_pool.puts, self.particle_pool.reuses
        )?;
        writeln!(
            f,
            "Stream arenas:    {} allocations, {} reuses ({} cache hits)",
            self.stream_arena.allocations,
            self.stream_arena.reuses,
            self.stream_arena.cache_hits()
        )?;
        writeln!(
            f,
            "Particle arenas:  {} allocations, {} reuses ({} cache hits)",
            self.particle_arena.allocations,
            self.particle_arena.reuses,
            self.particle_arena.cache_hits()
        )?;
        writeln!(f)?;
        writeln!(f, "Idle:")?;
        writeln!(f, "  Particle slices: {}", self.idle.particle_slices)?;
        writeln!(f, "  Voxel data:      {}", self.idle.voxel_data)?;
        writeln!(f, "  Buffers:         {}", self.idle.buffers)?;
        writeln!(f, "  Coordinates:     {}", self.idle.coordinates)?;
        writeln!(f, "  Stream arenas:   {}", self.idle.stream_arenas)?;
        writeln!(f, "  Particle arenas: {}", self.idle.particle_arenas)?;
        write!(f, "Retained:          {}", format_bytes(self.retained_bytes))
    }
}

/// Formats a byte count with a binary unit, e.g. `1.50 MB`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", UNITS[unit])
}
