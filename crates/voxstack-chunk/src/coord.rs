//! Coordinate validation for the three nested 4-wide levels.

use voxstack_geom::MortonKey;

use crate::error::{ChunkError, Level};

/// Cells per axis at every nesting level.
pub const AXIS: u32 = 4;
/// Bits per axis at every nesting level.
pub const AXIS_BITS: u32 = 2;
/// Entries in one `4^3` level.
pub const LEVEL_CELLS: usize = 64;

/// Sub-cells per axis across a whole chunk (voxel level concatenated with
/// sub-cell level).
pub const CHUNK_CELL_AXIS: u32 = AXIS * AXIS;
pub const CHUNK_CELL_MAX: u32 = CHUNK_CELL_AXIS - 1;
pub const CHUNK_CELLS: usize = LEVEL_CELLS * LEVEL_CELLS;

/// Encodes `(x, y, z)` at `level`, rejecting any axis outside `0..4`.
#[inline]
pub fn level_key(level: Level, x: u32, y: u32, z: u32) -> Result<MortonKey, ChunkError> {
    if x < AXIS && y < AXIS && z < AXIS {
        Ok(MortonKey::encode(x, y, z))
    } else {
        Err(ChunkError::InvalidCoordinate { level, x, y, z })
    }
}

/// Key of sub-cell `cell` of voxel `voxel` in the chunk's `16^3` sub-cell space.
#[inline]
pub const fn chunk_cell_key(voxel: MortonKey, cell: MortonKey) -> MortonKey {
    voxel.concat(cell, AXIS_BITS)
}
