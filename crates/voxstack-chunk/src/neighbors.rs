//! Cross-chunk neighbor resolution for the exposure update.

use voxstack_geom::MortonKey;
use voxstack_mesh_cpu::Face;

use crate::chunk::VoxelChunk;
use crate::coord::{CHUNK_CELL_MAX, CHUNK_CELLS};
use crate::neighbor_state::NeighborState;

/// What lies across one face of a chunk: a real chunk, or the shared empty
/// sentinel that answers "not solid" for every sub-cell and ignores writes.
pub enum NeighborSlot<'a> {
    Chunk(&'a mut VoxelChunk),
    Empty,
}

impl NeighborSlot<'_> {
    /// `None` for a key outside the chunk's `16^3` space.
    #[inline]
    pub fn state(&self, cell: MortonKey) -> Option<NeighborState> {
        match self {
            NeighborSlot::Chunk(c) => c.neighbor_state(cell),
            NeighborSlot::Empty => (cell.index() < CHUNK_CELLS).then_some(NeighborState::EMPTY),
        }
    }

    #[inline]
    pub fn is_empty_sentinel(&self) -> bool {
        matches!(self, NeighborSlot::Empty)
    }
}

/// Hands out the chunk adjacent to the one being edited.
pub trait NeighborAccess {
    fn across(&mut self, face: Face) -> NeighborSlot<'_>;
}

/// Resolver for a chunk outside any world: every face borders empty space.
#[derive(Copy, Clone, Debug, Default)]
pub struct Detached;

impl NeighborAccess for Detached {
    #[inline]
    fn across(&mut self, _face: Face) -> NeighborSlot<'_> {
        NeighborSlot::Empty
    }
}

/// Steps `cell` one sub-cell toward `face` inside the `16^3` chunk space, or
/// `None` when that would leave the chunk.
#[inline]
pub(crate) fn step_local(cell: MortonKey, face: Face) -> Option<MortonKey> {
    match face {
        Face::Front => (cell.z() > 0).then(|| cell.dec_z()),
        Face::Back => (cell.z() < CHUNK_CELL_MAX).then(|| cell.inc_z()),
        Face::Left => (cell.x() > 0).then(|| cell.dec_x()),
        Face::Right => (cell.x() < CHUNK_CELL_MAX).then(|| cell.inc_x()),
        Face::Up => (cell.y() < CHUNK_CELL_MAX).then(|| cell.inc_y()),
        Face::Down => (cell.y() > 0).then(|| cell.dec_y()),
    }
}

/// The sub-cell in the adjacent chunk that touches boundary cell `cell`
/// across `face`: the crossed axis wraps to the opposite side.
#[inline]
pub(crate) fn wrap_across(cell: MortonKey, face: Face) -> MortonKey {
    match face {
        Face::Front => cell.with_z(CHUNK_CELL_MAX),
        Face::Back => cell.with_z(0),
        Face::Left => cell.with_x(CHUNK_CELL_MAX),
        Face::Right => cell.with_x(0),
        Face::Up => cell.with_y(0),
        Face::Down => cell.with_y(CHUNK_CELL_MAX),
    }
}
