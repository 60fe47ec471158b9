//! A 4x4x4 voxel chunk with incrementally maintained sub-cell exposure.

use std::cell::Cell;
use std::time::Instant;

use voxstack_blocks::{SubVoxel, Voxel, VoxelType};
use voxstack_geom::MortonKey;
use voxstack_mesh_cpu::{Face, face_table};

use crate::coord::{CHUNK_CELLS, LEVEL_CELLS, chunk_cell_key, level_key};
use crate::error::{ChunkError, Level};
use crate::neighbor_state::NeighborState;
use crate::neighbors::{Detached, NeighborAccess, NeighborSlot, step_local, wrap_across};

/// Voxel types and occupancy for 64 voxels, plus one [`NeighborState`] per
/// sub-cell (4096, Morton-ordered over the chunk's `16^3` sub-cell space).
///
/// Invariant: for every solid sub-cell, exposure bit `k` is set iff the
/// neighbor across face `k` is not solid. Non-solid sub-cells carry no
/// exposure bits.
#[derive(Clone, Debug)]
pub struct VoxelChunk {
    types: [VoxelType; LEVEL_CELLS],
    substates: [SubVoxel; LEVEL_CELLS],
    state: Box<[NeighborState]>,
    // Coordinate in the owning world; the world itself is supplied per call.
    attachment: Option<MortonKey>,
    vertex_count: Cell<Option<u32>>,
    dirty: bool,
}

impl Default for VoxelChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelChunk {
    pub fn new() -> Self {
        Self {
            types: [0; LEVEL_CELLS],
            substates: [SubVoxel::EMPTY; LEVEL_CELLS],
            state: vec![NeighborState::EMPTY; CHUNK_CELLS].into_boxed_slice(),
            attachment: None,
            vertex_count: Cell::new(None),
            dirty: true,
        }
    }

    pub fn attach(&mut self, key: MortonKey) {
        log::debug!("chunk attached at {:?}", key.decode());
        self.attachment = Some(key);
    }

    /// Drops the relation to the owning world. Voxel data is kept.
    pub fn detach(&mut self) {
        if let Some(key) = self.attachment.take() {
            log::debug!("chunk detached from {:?}", key.decode());
        }
    }

    #[inline]
    pub fn local_key(&self) -> Option<MortonKey> {
        self.attachment
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> Result<Voxel, ChunkError> {
        let key = level_key(Level::Voxel, x, y, z)?;
        Ok(self.voxel_at(key))
    }

    #[inline]
    pub(crate) fn voxel_at(&self, key: MortonKey) -> Voxel {
        Voxel::new(self.types[key.index()], self.substates[key.index()])
    }

    /// Writes a voxel into a chunk with no world around it; faces on the chunk
    /// boundary are treated as bordering empty space. Returns whether any
    /// sub-cell occupancy changed.
    pub fn set(&mut self, x: u32, y: u32, z: u32, voxel: Voxel) -> Result<bool, ChunkError> {
        self.set_with(x, y, z, voxel, &mut Detached)
    }

    /// Writes a voxel, resolving boundary neighbors through `neighbors`.
    /// Nothing is mutated when the coordinate is rejected.
    pub fn set_with(
        &mut self,
        x: u32,
        y: u32,
        z: u32,
        voxel: Voxel,
        neighbors: &mut impl NeighborAccess,
    ) -> Result<bool, ChunkError> {
        let key = level_key(Level::Voxel, x, y, z)?;
        Ok(self.apply(key, voxel, neighbors))
    }

    /// Writes `voxel` into every voxel slot.
    pub fn fill(&mut self, voxel: Voxel) {
        self.fill_with(voxel, &mut Detached);
    }

    pub fn fill_with(&mut self, voxel: Voxel, neighbors: &mut impl NeighborAccess) {
        for key in MortonKey::cube(2) {
            self.apply(key, voxel, neighbors);
        }
    }

    pub(crate) fn apply(
        &mut self,
        key: MortonKey,
        voxel: Voxel,
        neighbors: &mut impl NeighborAccess,
    ) -> bool {
        let slot = key.index();
        let old = self.substates[slot];
        self.types[slot] = voxel.ty;
        self.substates[slot] = voxel.state;

        let diff = old.changed(voxel.state);
        if diff.is_empty() {
            return false;
        }
        log::trace!("voxel {:?}: {} sub-cells changed", key.decode(), diff.bit_count());

        // Solidity first so the exposure pass sees every changed cell's final state.
        for bit in diff {
            let cell = chunk_cell_key(key, MortonKey::from_raw(bit));
            let s = &mut self.state[cell.index()];
            *s = s.with_solid(voxel.state.get(bit));
        }
        for bit in diff {
            let cell = chunk_cell_key(key, MortonKey::from_raw(bit));
            self.refresh_exposure(cell, neighbors);
        }

        self.invalidate();
        true
    }

    /// Recomputes both sides of every face of `cell`.
    fn refresh_exposure(&mut self, cell: MortonKey, neighbors: &mut impl NeighborAccess) {
        let current = self.state[cell.index()];
        let solid = current.is_solid();
        let mut next = current;
        for face in Face::ALL {
            let neighbor_solid = match step_local(cell, face) {
                Some(n) => {
                    let ns = self.state[n.index()];
                    let n_solid = ns.is_solid();
                    self.state[n.index()] = ns.with_exposed(face.opposite(), n_solid && !solid);
                    n_solid
                }
                None => match neighbors.across(face) {
                    NeighborSlot::Chunk(chunk) => {
                        chunk.border_update(wrap_across(cell, face), face.opposite(), solid)
                    }
                    NeighborSlot::Empty => false,
                },
            };
            next = next.with_exposed(face, solid && !neighbor_solid);
        }
        self.state[cell.index()] = next;
    }

    /// Updates this chunk's side of a face shared with an adjacent chunk and
    /// returns whether `cell` is solid.
    pub(crate) fn border_update(&mut self, cell: MortonKey, toward: Face, other_solid: bool) -> bool {
        let s = self.state_at(cell);
        let solid = s.is_solid();
        let next = s.with_exposed(toward, solid && !other_solid);
        if next != s {
            self.state[cell.index()] = next;
            self.invalidate();
        }
        solid
    }

    /// Recomputes both sides of every face on this chunk's border toward
    /// `face`, against whatever `other` holds.
    pub(crate) fn reconcile_border(&mut self, face: Face, mut other: NeighborSlot<'_>) {
        let toward = face.opposite();
        for cell in MortonKey::cube(4).filter(|c| step_local(*c, face).is_none()) {
            let solid = self.state_at(cell).is_solid();
            let other_solid = match &mut other {
                NeighborSlot::Chunk(c) => c.border_update(wrap_across(cell, face), toward, solid),
                NeighborSlot::Empty => false,
            };
            self.border_update(cell, face, other_solid);
        }
    }

    #[inline]
    fn invalidate(&mut self) {
        self.dirty = true;
        self.vertex_count.set(None);
    }

    /// Raw neighbor state of a sub-cell in the chunk's `16^3` space, or
    /// `None` for a key outside it.
    #[inline]
    pub fn neighbor_state(&self, cell: MortonKey) -> Option<NeighborState> {
        self.state.get(cell.index()).copied()
    }

    #[inline]
    pub(crate) fn state_at(&self, cell: MortonKey) -> NeighborState {
        self.state[cell.index()]
    }

    #[inline]
    pub fn states(&self) -> &[NeighborState] {
        &self.state
    }

    /// Vertices needed to draw every exposed face; memoized until the next
    /// change to this chunk.
    pub fn vertex_count(&self) -> u32 {
        if let Some(n) = self.vertex_count.get() {
            return n;
        }
        let t0 = Instant::now();
        let table = face_table();
        let n = self.state.iter().map(|s| table.vertex_count(s.exposure())).sum();
        log::debug!(target: "perf", "us={} chunk_vertex_count verts={}", t0.elapsed().as_micros(), n);
        self.vertex_count.set(Some(n));
        n
    }

    /// Solid sub-cells across all voxels.
    pub fn solid_count(&self) -> u32 {
        self.substates.iter().map(|s| s.len()).sum()
    }

    /// Sub-cells with at least one exposed face, in ascending Morton order,
    /// paired with their exposure pattern.
    pub fn visible_cells(&self) -> impl Iterator<Item = (MortonKey, u8)> + '_ {
        self.state
            .iter()
            .enumerate()
            .filter(|(_, s)| s.exposure() != 0)
            .map(|(i, s)| (MortonKey::from_raw(i as u32), s.exposure()))
    }
}
