//! A 4x4x4 grid of lazily created voxel chunks with cross-chunk routing.

use voxstack_blocks::Voxel;
use voxstack_geom::MortonKey;
use voxstack_mesh_cpu::Face;

use crate::chunk::VoxelChunk;
use crate::coord::{AXIS, LEVEL_CELLS, level_key};
use crate::error::{ChunkError, Level};
use crate::neighbors::{NeighborAccess, NeighborSlot};

const WORLD_MAX: u32 = AXIS - 1;

/// Chunks are stored in Morton order and created on first touch. Requests
/// past the world edge resolve to the empty sentinel.
#[derive(Clone, Debug)]
pub struct WorldChunk {
    chunks: Vec<Option<Box<VoxelChunk>>>,
}

impl Default for WorldChunk {
    fn default() -> Self {
        Self::new()
    }
}

/// The chunk key one step across `face`, or `None` at the world boundary.
#[inline]
fn step_world(key: MortonKey, face: Face) -> Option<MortonKey> {
    match face {
        Face::Front => (key.z() > 0).then(|| key.dec_z()),
        Face::Back => (key.z() < WORLD_MAX).then(|| key.inc_z()),
        Face::Left => (key.x() > 0).then(|| key.dec_x()),
        Face::Right => (key.x() < WORLD_MAX).then(|| key.inc_x()),
        Face::Up => (key.y() < WORLD_MAX).then(|| key.inc_y()),
        Face::Down => (key.y() > 0).then(|| key.dec_y()),
    }
}

fn new_attached(key: MortonKey) -> Box<VoxelChunk> {
    log::debug!("instantiating chunk {:?}", key.decode());
    let mut chunk = Box::new(VoxelChunk::new());
    chunk.attach(key);
    chunk
}

#[inline]
fn slot_or_create(slot: &mut Option<Box<VoxelChunk>>, key: MortonKey) -> &mut VoxelChunk {
    slot.get_or_insert_with(|| new_attached(key))
}

/// Neighbor resolver over the world's other slots while the edited chunk is
/// held outside the array.
struct WorldNeighbors<'w> {
    chunks: &'w mut [Option<Box<VoxelChunk>>],
    origin: MortonKey,
}

impl NeighborAccess for WorldNeighbors<'_> {
    fn across(&mut self, face: Face) -> NeighborSlot<'_> {
        match step_world(self.origin, face) {
            Some(key) => NeighborSlot::Chunk(slot_or_create(&mut self.chunks[key.index()], key)),
            None => NeighborSlot::Empty,
        }
    }
}

impl WorldChunk {
    pub fn new() -> Self {
        Self { chunks: (0..LEVEL_CELLS).map(|_| None).collect() }
    }

    /// The chunk at `(x, y, z)`, instantiated and attached on first touch.
    pub fn get(&mut self, x: u32, y: u32, z: u32) -> Result<&VoxelChunk, ChunkError> {
        let key = level_key(Level::Chunk, x, y, z)?;
        Ok(slot_or_create(&mut self.chunks[key.index()], key))
    }

    /// The chunk at `key` if it has been instantiated.
    #[inline]
    pub fn loaded(&self, key: MortonKey) -> Option<&VoxelChunk> {
        self.chunks.get(key.index()).and_then(|c| c.as_deref())
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_some()).count()
    }

    /// The chunk across `face` from `(x, y, z)`: the adjacent chunk (created
    /// if needed), or the empty sentinel when `(x, y, z)` sits on that world
    /// boundary.
    pub fn neighbor(&mut self, x: u32, y: u32, z: u32, face: Face) -> Result<NeighborSlot<'_>, ChunkError> {
        let key = level_key(Level::Chunk, x, y, z)?;
        Ok(match step_world(key, face) {
            Some(n) => NeighborSlot::Chunk(slot_or_create(&mut self.chunks[n.index()], n)),
            None => NeighborSlot::Empty,
        })
    }

    pub fn neighbor_above(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Up)
    }

    pub fn neighbor_below(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Down)
    }

    pub fn neighbor_left(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Left)
    }

    pub fn neighbor_right(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Right)
    }

    pub fn neighbor_front(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Front)
    }

    pub fn neighbor_back(&mut self, x: u32, y: u32, z: u32) -> Result<NeighborSlot<'_>, ChunkError> {
        self.neighbor(x, y, z, Face::Back)
    }

    /// Writes one voxel of chunk `chunk`, propagating exposure into adjacent
    /// chunks. Both coordinates are validated before anything is touched.
    pub fn set_voxel(
        &mut self,
        chunk: (u32, u32, u32),
        voxel: (u32, u32, u32),
        value: Voxel,
    ) -> Result<bool, ChunkError> {
        let ck = level_key(Level::Chunk, chunk.0, chunk.1, chunk.2)?;
        let vk = level_key(Level::Voxel, voxel.0, voxel.1, voxel.2)?;
        Ok(self.with_chunk(ck, |c, nb| c.apply(vk, value, nb)))
    }

    pub fn get_voxel(&mut self, chunk: (u32, u32, u32), voxel: (u32, u32, u32)) -> Result<Voxel, ChunkError> {
        let vk = level_key(Level::Voxel, voxel.0, voxel.1, voxel.2)?;
        Ok(self.get(chunk.0, chunk.1, chunk.2)?.voxel_at(vk))
    }

    /// Fills every voxel of one chunk.
    pub fn fill_chunk(&mut self, x: u32, y: u32, z: u32, value: Voxel) -> Result<(), ChunkError> {
        let ck = level_key(Level::Chunk, x, y, z)?;
        self.with_chunk(ck, |c, nb| c.fill_with(value, nb));
        Ok(())
    }

    /// Fills every voxel of every chunk.
    pub fn fill(&mut self, value: Voxel) {
        for key in MortonKey::cube(2) {
            self.with_chunk(key, |c, nb| c.fill_with(value, nb));
        }
    }

    // The edited chunk leaves its slot for the duration of `f` so the
    // neighbor resolver can borrow the remaining slots mutably.
    fn with_chunk<R>(
        &mut self,
        key: MortonKey,
        f: impl FnOnce(&mut VoxelChunk, &mut WorldNeighbors<'_>) -> R,
    ) -> R {
        let mut chunk = self.chunks[key.index()]
            .take()
            .unwrap_or_else(|| new_attached(key));
        let out = f(&mut chunk, &mut WorldNeighbors { chunks: &mut self.chunks, origin: key });
        self.chunks[key.index()] = Some(chunk);
        out
    }

    /// Removes a chunk from the world, detaching it. The faces adjacent
    /// chunks share with the vacated slot become exposed again, and the
    /// returned chunk's own border is recomputed against empty space.
    pub fn evict(&mut self, x: u32, y: u32, z: u32) -> Result<Option<Box<VoxelChunk>>, ChunkError> {
        let key = level_key(Level::Chunk, x, y, z)?;
        let Some(mut chunk) = self.chunks[key.index()].take() else {
            return Ok(None);
        };
        chunk.detach();
        for face in Face::ALL {
            chunk.reconcile_border(face, NeighborSlot::Empty);
            if let Some(n) = step_world(key, face) {
                if let Some(other) = self.chunks[n.index()].as_deref_mut() {
                    other.reconcile_border(face.opposite(), NeighborSlot::Empty);
                }
            }
        }
        Ok(Some(chunk))
    }

    /// Places a chunk at `(x, y, z)`, attaching it and reconciling its six
    /// border planes with the loaded neighbors (absent neighbors count as
    /// empty). Whatever was there before is evicted and returned.
    pub fn insert(
        &mut self,
        x: u32,
        y: u32,
        z: u32,
        mut chunk: Box<VoxelChunk>,
    ) -> Result<Option<Box<VoxelChunk>>, ChunkError> {
        let key = level_key(Level::Chunk, x, y, z)?;
        let previous = self.evict(x, y, z)?;
        chunk.attach(key);
        for face in Face::ALL {
            let other = match step_world(key, face) {
                Some(n) => match self.chunks[n.index()].as_deref_mut() {
                    Some(c) => NeighborSlot::Chunk(c),
                    None => NeighborSlot::Empty,
                },
                None => NeighborSlot::Empty,
            };
            chunk.reconcile_border(face, other);
        }
        self.chunks[key.index()] = Some(chunk);
        Ok(previous)
    }

    /// Keys of loaded chunks flagged dirty, in Morton order.
    pub fn dirty_keys(&self) -> impl Iterator<Item = MortonKey> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_ref().is_some_and(|c| c.is_dirty()))
            .map(|(i, _)| MortonKey::from_raw(i as u32))
    }

    pub fn clear_dirty(&mut self, key: MortonKey) {
        if let Some(Some(c)) = self.chunks.get_mut(key.index()) {
            c.clear_dirty();
        }
    }

    /// Total vertex count across loaded chunks.
    pub fn vertex_count(&self) -> u64 {
        self.chunks.iter().flatten().map(|c| u64::from(c.vertex_count())).sum()
    }
}
