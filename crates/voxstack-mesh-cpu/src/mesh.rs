use voxstack_geom::Vec3;

use crate::constants::{INDICES_PER_FACE, QUAD_INDICES, VERTS_PER_FACE};
use crate::face_table::FaceTable;

/// Flat triangle-list output: positions and normals per vertex, indices in
/// groups of six per quad.
#[derive(Default, Clone, Debug)]
pub struct MeshOutput {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshOutput {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }

    /// Pre-reserve capacity for `n_verts` vertices worth of quads.
    #[inline]
    pub fn reserve_vertices(&mut self, n_verts: usize) {
        self.positions.reserve(n_verts);
        self.normals.reserve(n_verts);
        self.indices.reserve(n_verts / VERTS_PER_FACE * INDICES_PER_FACE);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends the quads for `pattern`, translated to `origin`.
    pub fn push_pattern(&mut self, table: &FaceTable, pattern: u8, origin: Vec3) {
        let verts = table.vertices(pattern);
        if verts.is_empty() {
            return;
        }
        for quad_base in (self.positions.len()..self.positions.len() + verts.len()).step_by(VERTS_PER_FACE) {
            let base = quad_base as u32;
            self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }
        self.positions.extend(verts.iter().map(|v| *v + origin));
        self.normals.extend_from_slice(table.normals(pattern));
    }
}
