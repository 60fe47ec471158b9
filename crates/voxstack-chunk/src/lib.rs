//! Sub-voxel chunks with incremental face-exposure tracking.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod coord;
pub mod error;
pub mod mesh;
pub mod neighbor_state;
pub mod neighbors;
pub mod world;

pub use chunk::VoxelChunk;
pub use error::{ChunkError, Level};
pub use mesh::fill_mesh;
pub use neighbor_state::NeighborState;
pub use neighbors::{Detached, NeighborAccess, NeighborSlot};
pub use world::WorldChunk;
