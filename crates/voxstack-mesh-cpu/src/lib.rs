//! CPU-side face lookup and debug mesh assembly for sub-voxel chunks.
#![forbid(unsafe_code)]

pub mod constants;
pub mod face;
pub mod face_table;
pub mod mesh;

pub use constants::{PATTERN_COUNT, SUBCELL_SIZE, VERTS_PER_FACE};
pub use face::Face;
pub use face_table::{FaceTable, face_table};
pub use mesh::MeshOutput;
