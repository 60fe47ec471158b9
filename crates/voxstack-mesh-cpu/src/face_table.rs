//! Exposure-pattern lookup: for each 6-bit pattern, one quad per exposed face.
//!
//! Vertices and normals live in two flat arrays; `offsets[p]..offsets[p + 1]`
//! is the slice for pattern `p`. Vertex positions are in world units relative
//! to the sub-cell's minimum corner.

use std::ops::Range;
use std::sync::OnceLock;

use voxstack_geom::Vec3;

use crate::constants::{PATTERN_COUNT, SUBCELL_SIZE, VERTS_PER_FACE};
use crate::face::Face;

pub struct FaceTable {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    offsets: [u32; PATTERN_COUNT + 1],
}

impl FaceTable {
    fn build() -> Self {
        let total = (0..PATTERN_COUNT)
            .map(|p| (p as u8).count_ones() as usize * VERTS_PER_FACE)
            .sum();
        let mut vertices = Vec::with_capacity(total);
        let mut normals = Vec::with_capacity(total);
        let mut offsets = [0u32; PATTERN_COUNT + 1];
        for p in 0..PATTERN_COUNT {
            offsets[p] = vertices.len() as u32;
            for face in Face::ALL {
                if p as u8 & face.bit() == 0 {
                    continue;
                }
                let n = face.normal();
                for [x, y, z] in face.corners() {
                    vertices.push(Vec3::new(x as f32, y as f32, z as f32) * SUBCELL_SIZE);
                    normals.push(n);
                }
            }
        }
        offsets[PATTERN_COUNT] = vertices.len() as u32;
        log::debug!("face table built: {} vertices over {} patterns", vertices.len(), PATTERN_COUNT);
        FaceTable { vertices, normals, offsets }
    }

    /// The 65-entry offset index into the vertex and normal arrays.
    #[inline]
    pub fn offsets(&self) -> &[u32; PATTERN_COUNT + 1] {
        &self.offsets
    }

    #[inline]
    pub fn range(&self, pattern: u8) -> Range<usize> {
        let p = pattern as usize;
        debug_assert!(p < PATTERN_COUNT);
        self.offsets[p] as usize..self.offsets[p + 1] as usize
    }

    #[inline]
    pub fn vertex_count(&self, pattern: u8) -> u32 {
        let p = pattern as usize;
        self.offsets[p + 1] - self.offsets[p]
    }

    #[inline]
    pub fn vertices(&self, pattern: u8) -> &[Vec3] {
        &self.vertices[self.range(pattern)]
    }

    #[inline]
    pub fn normals(&self, pattern: u8) -> &[Vec3] {
        &self.normals[self.range(pattern)]
    }

    #[inline]
    pub fn all_vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn all_normals(&self) -> &[Vec3] {
        &self.normals
    }
}

/// Process-wide table, built on first use and never mutated.
pub fn face_table() -> &'static FaceTable {
    static TABLE: OnceLock<FaceTable> = OnceLock::new();
    TABLE.get_or_init(FaceTable::build)
}
