//! Shared constants for voxstack-mesh-cpu.

pub(crate) const FACE_COUNT: usize = 6;
/// 2^6 exposure patterns, one per combination of exposed faces.
pub const PATTERN_COUNT: usize = 1 << FACE_COUNT;
pub const VERTS_PER_FACE: usize = 4;
pub const INDICES_PER_FACE: usize = 6;

/// World units per sub-cell edge (four sub-cells per voxel).
pub const SUBCELL_SIZE: f32 = 0.25;

/// Two triangles per quad, relative to the quad's first vertex.
pub(crate) const QUAD_INDICES: [u32; INDICES_PER_FACE] = [0, 1, 2, 0, 2, 3];
