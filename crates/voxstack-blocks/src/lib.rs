//! Voxel payload and sub-voxel occupancy types.
#![forbid(unsafe_code)]

pub mod subvoxel;
pub mod types;

pub use subvoxel::SubVoxel;
pub use types::{Voxel, VoxelType};
