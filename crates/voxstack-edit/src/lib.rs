//! Buffered world edits and dirty-chunk rebuild tracking.
#![forbid(unsafe_code)]

use hashbrown::HashMap;
use voxstack_blocks::Voxel;
use voxstack_chunk::coord::level_key;
use voxstack_chunk::{ChunkError, Level, VoxelChunk, WorldChunk};
use voxstack_geom::MortonKey;

/// One pending change to a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Replace a whole voxel (type and occupancy).
    Voxel {
        chunk: (u32, u32, u32),
        voxel: (u32, u32, u32),
        value: Voxel,
    },
    /// Flip a single sub-cell, keeping the voxel's type.
    SubCell {
        chunk: (u32, u32, u32),
        voxel: (u32, u32, u32),
        cell: (u32, u32, u32),
        solid: bool,
    },
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildReport {
    pub rebuilt: usize,
    pub vertices: u64,
}

/// What the last rebuild of a chunk produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltChunk {
    pub rev: u64,
    pub vertex_count: u32,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct EditQueueStats {
    pub pending: usize,
    pub built_entries: usize,
    pub built_vertices: u64,
    pub rev: u64,
}

/// Host-facing edit buffer: queue edits, apply them in one batch, then
/// rebuild whatever the batch left dirty.
#[derive(Default, Debug)]
pub struct EditQueue {
    pending: Vec<Edit>,
    built: HashMap<MortonKey, BuiltChunk>,
    counter: u64,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        self.pending.push(edit);
    }

    pub fn extend(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.pending.extend(edits);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn stats(&self) -> EditQueueStats {
        EditQueueStats {
            pending: self.pending.len(),
            built_entries: self.built.len(),
            built_vertices: self.built.values().map(|b| u64::from(b.vertex_count)).sum(),
            rev: self.counter,
        }
    }

    /// Applies every queued edit in submission order. A rejected edit is
    /// logged and skipped; it never leaves partial changes behind.
    pub fn apply_edits(&mut self, world: &mut WorldChunk) -> ApplyReport {
        let mut report = ApplyReport::default();
        for edit in self.pending.drain(..) {
            match apply_one(world, edit) {
                Ok(true) => report.applied += 1,
                Ok(false) => report.unchanged += 1,
                Err(e) => {
                    log::warn!("edit rejected: {e} ({edit:?})");
                    report.rejected += 1;
                }
            }
        }
        log::debug!(
            "applied edits: {} changed, {} unchanged, {} rejected",
            report.applied,
            report.unchanged,
            report.rejected
        );
        report
    }

    /// Hands every dirty chunk to `build` in Morton order, records what was
    /// built, and clears the chunk's dirty flag.
    pub fn rebuild_if_dirty(
        &mut self,
        world: &mut WorldChunk,
        mut build: impl FnMut(MortonKey, &VoxelChunk),
    ) -> RebuildReport {
        let dirty: Vec<MortonKey> = world.dirty_keys().collect();
        let mut report = RebuildReport::default();
        if dirty.is_empty() {
            return report;
        }
        self.counter = self.counter.wrapping_add(1).max(1);
        let rev = self.counter;
        for key in dirty {
            let Some(chunk) = world.loaded(key) else { continue };
            build(key, chunk);
            let vertex_count = chunk.vertex_count();
            self.built.insert(key, BuiltChunk { rev, vertex_count });
            report.rebuilt += 1;
            report.vertices += u64::from(vertex_count);
            world.clear_dirty(key);
        }
        log::debug!("rebuilt {} chunks, {} vertices (rev {rev})", report.rebuilt, report.vertices);
        report
    }

    pub fn built(&self, key: MortonKey) -> Option<BuiltChunk> {
        self.built.get(&key).copied()
    }

    /// Drops build records for a chunk that left the world.
    pub fn forget(&mut self, key: MortonKey) -> Option<BuiltChunk> {
        self.built.remove(&key)
    }
}

fn apply_one(world: &mut WorldChunk, edit: Edit) -> Result<bool, ChunkError> {
    match edit {
        Edit::Voxel { chunk, voxel, value } => world.set_voxel(chunk, voxel, value),
        Edit::SubCell { chunk, voxel, cell, solid } => {
            // validate every level before the read can instantiate a chunk
            level_key(Level::Chunk, chunk.0, chunk.1, chunk.2)?;
            level_key(Level::Voxel, voxel.0, voxel.1, voxel.2)?;
            let ck = level_key(Level::SubCell, cell.0, cell.1, cell.2)?;
            let current = world.get_voxel(chunk, voxel)?;
            let state = current.state.set(ck.raw(), solid);
            world.set_voxel(chunk, voxel, Voxel::new(current.ty, state))
        }
    }
}
