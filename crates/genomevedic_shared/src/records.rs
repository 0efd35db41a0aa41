//! Fixed-size records stored in arenas and pooled slices.
//!
//! These are the canonical in-memory layouts. Parsers write them, the
//! renderer uploads them untouched.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One genomic data point in 3D space.
///
/// Layout: position (12) + color (16) + size (4) + metadata (8) = 40 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Particle {
    /// X, Y, Z in world space.
    pub position: [f32; 3],
    /// R, G, B, A.
    pub color: [f32; 4],
    /// Rendered point size.
    pub size: f32,
    /// Genomic position or other packed metadata.
    pub metadata: u64,
}

impl Particle {
    /// Creates a new particle.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], color: [f32; 4], size: f32, metadata: u64) -> Self {
        Self {
            position,
            color,
            size,
            metadata,
        }
    }
}

/// Spatial index entry for one voxel.
///
/// Layout: origin (12) + extent (12) + first particle (4) + count (4) = 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct VoxelIndexEntry {
    /// Minimum corner in world space.
    pub origin: [f32; 3],
    /// Edge lengths.
    pub extent: [f32; 3],
    /// Index of the first particle belonging to this voxel.
    pub first_particle: u32,
    /// Number of particles in this voxel.
    pub particle_count: u32,
}

impl VoxelIndexEntry {
    /// Creates a new voxel entry.
    #[inline]
    #[must_use]
    pub const fn new(
        origin: [f32; 3],
        extent: [f32; 3],
        first_particle: u32,
        particle_count: u32,
    ) -> Self {
        Self {
            origin,
            extent,
            first_particle,
            particle_count,
        }
    }
}

/// A bare 3D coordinate.
pub type Coordinate = [f32; 3];

/// Bytes per particle record.
pub const PARTICLE_RECORD_SIZE: usize = std::mem::size_of::<Particle>();

/// Bytes per voxel index record.
pub const VOXEL_RECORD_SIZE: usize = std::mem::size_of::<VoxelIndexEntry>();

/// Bytes per coordinate.
pub const COORDINATE_RECORD_SIZE: usize = std::mem::size_of::<Coordinate>();

// Arenas hand out 8-byte aligned spans; a wider record could not be viewed in place.
const _: () = assert!(PARTICLE_RECORD_SIZE == 40);
const _: () = assert!(VOXEL_RECORD_SIZE == 32);
const _: () = assert!(std::mem::align_of::<Particle>() <= 8);
const _: () = assert!(std::mem::align_of::<VoxelIndexEntry>() <= 8);
