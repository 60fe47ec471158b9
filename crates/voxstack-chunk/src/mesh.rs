//! Debug mesh assembly straight from a chunk's exposure bytes. Production
//! rendering consumes `vertex_count` and the face table on the GPU instead.

use voxstack_geom::{MortonKey, Vec3};
use voxstack_mesh_cpu::{MeshOutput, SUBCELL_SIZE, face_table};

use crate::chunk::VoxelChunk;

/// Rebuilds `out` with one quad per exposed sub-cell face, walking sub-cells
/// in ascending Morton order.
pub fn fill_mesh(chunk: &VoxelChunk, out: &mut MeshOutput) {
    let table = face_table();
    out.clear_keep_capacity();
    out.reserve_vertices(chunk.vertex_count() as usize);
    for (i, s) in chunk.states().iter().enumerate() {
        let pattern = s.exposure();
        if pattern == 0 {
            continue;
        }
        let origin = Vec3::from_grid(MortonKey::from_raw(i as u32).decode(), SUBCELL_SIZE);
        out.push_pattern(table, pattern, origin);
    }
    debug_assert_eq!(out.vertex_count(), chunk.vertex_count() as usize);
}
