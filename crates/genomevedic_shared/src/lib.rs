//! # GenomeVedic Shared
//!
//! Fixed-size record layouts used by every stage of the particle pipeline.
//!
//! ## CRITICAL RULE
//!
//! Records are stored contiguously as raw bytes inside arenas and pooled
//! slices. They must stay:
//! - `#[repr(C)]` with no padding
//! - `Pod` (bitwise copyable, any bit pattern valid)
//! - aligned to at most 8 bytes (arena reservations are 8-byte aligned)
//!
//! If you need a type with heap data, it does not belong here.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod records;

pub use constants::{
    ARENA_ALIGNMENT, COORDINATE_SLICE_CAPACITY, PARTICLE_ARENA_RECORDS, PARTICLE_SLICE_CAPACITY,
    RAW_BUFFER_SIZE, STREAM_ARENA_SIZE, STREAM_CHUNK_SIZE, VOXEL_INDEX_CAPACITY,
};
pub use records::{
    Coordinate, Particle, VoxelIndexEntry, COORDINATE_RECORD_SIZE, PARTICLE_RECORD_SIZE,
    VOXEL_RECORD_SIZE,
};
