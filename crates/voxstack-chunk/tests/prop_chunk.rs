use proptest::prelude::*;
use voxstack_blocks::{SubVoxel, Voxel};
use voxstack_chunk::{VoxelChunk, WorldChunk};
use voxstack_geom::MortonKey;
use voxstack_mesh_cpu::Face;

fn coord4() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..4, 0u32..4, 0u32..4)
}

// Sparse masks make partial exposure far more common than uniform u64s.
fn mask() -> impl Strategy<Value = SubVoxel> {
    prop_oneof![
        any::<u64>().prop_map(SubVoxel::new),
        (any::<u64>(), any::<u64>()).prop_map(|(a, b)| SubVoxel::new(a & b & 0x00FF_00FF_00FF_00FF)),
        Just(SubVoxel::FULL),
        Just(SubVoxel::EMPTY),
    ]
}

fn voxel() -> impl Strategy<Value = Voxel> {
    (any::<u16>(), mask()).prop_map(|(ty, s)| Voxel::new(ty, s))
}

fn signed_step(c: (u32, u32, u32), face: Face) -> (i32, i32, i32) {
    let (dx, dy, dz) = face.delta();
    (c.0 as i32 + dx, c.1 as i32 + dy, c.2 as i32 + dz)
}

/// Checks every sub-cell of a lone chunk against a from-scratch evaluation.
fn assert_consistent_detached(c: &VoxelChunk) -> Result<(), TestCaseError> {
    for key in MortonKey::cube(4) {
        let s = c.neighbor_state(key).unwrap();
        for face in Face::ALL {
            let (x, y, z) = signed_step(key.decode(), face);
            let inside = (0..16).contains(&x) && (0..16).contains(&y) && (0..16).contains(&z);
            let n_solid = inside
                && c.neighbor_state(MortonKey::encode(x as u32, y as u32, z as u32)).unwrap().is_solid();
            prop_assert_eq!(s.is_exposed(face), s.is_solid() && !n_solid, "cell {:?} face {:?}", key.decode(), face);
        }
    }
    Ok(())
}

/// World-wide solidity of sub-cell `(x, y, z)` in the `64^3` sub-cell space.
fn world_solid(w: &WorldChunk, x: i32, y: i32, z: i32) -> bool {
    if !(0..64).contains(&x) || !(0..64).contains(&y) || !(0..64).contains(&z) {
        return false;
    }
    let (x, y, z) = (x as u32, y as u32, z as u32);
    let chunk = MortonKey::encode(x / 16, y / 16, z / 16);
    w.loaded(chunk)
        .is_some_and(|c| c.neighbor_state(MortonKey::encode(x % 16, y % 16, z % 16)).unwrap().is_solid())
}

fn assert_consistent_world(w: &WorldChunk) -> Result<(), TestCaseError> {
    for ck in MortonKey::cube(2) {
        let Some(c) = w.loaded(ck) else { continue };
        let (cx, cy, cz) = ck.decode();
        for key in MortonKey::cube(4) {
            let s = c.neighbor_state(key).unwrap();
            let (x, y, z) = key.decode();
            let abs = (cx * 16 + x, cy * 16 + y, cz * 16 + z);
            for face in Face::ALL {
                let (nx, ny, nz) = signed_step(abs, face);
                let expect = s.is_solid() && !world_solid(w, nx, ny, nz);
                prop_assert_eq!(s.is_exposed(face), expect, "cell {:?} face {:?}", abs, face);
            }
        }
    }
    Ok(())
}

#[derive(Clone, Debug)]
enum WorldOp {
    Write((u32, u32, u32), (u32, u32, u32), Voxel),
    Evict((u32, u32, u32)),
    Touch((u32, u32, u32)),
    Insert((u32, u32, u32), Voxel),
}

fn chunk_near_origin() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..2, 0u32..2, 0u32..2)
}

fn world_op() -> impl Strategy<Value = WorldOp> {
    prop_oneof![
        4 => (chunk_near_origin(), coord4(), voxel()).prop_map(|(c, vx, v)| WorldOp::Write(c, vx, v)),
        1 => chunk_near_origin().prop_map(WorldOp::Evict),
        1 => chunk_near_origin().prop_map(WorldOp::Touch),
        1 => (chunk_near_origin(), voxel()).prop_map(|(c, v)| WorldOp::Insert(c, v)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Any write sequence on a lone chunk leaves exposure == solid & !neighbor_solid
    #[test]
    fn detached_writes_keep_invariant(writes in prop::collection::vec((coord4(), voxel()), 1..24)) {
        let mut c = VoxelChunk::new();
        for ((x, y, z), v) in writes {
            c.set(x, y, z, v).unwrap();
        }
        assert_consistent_detached(&c)?;
    }

    // Writes across neighboring chunks keep both sides of every border in agreement
    #[test]
    fn world_writes_keep_invariant(
        writes in prop::collection::vec(((0u32..2, 0u32..2, 0u32..2), coord4(), voxel()), 1..16)
    ) {
        let mut w = WorldChunk::new();
        for (chunk, vx, v) in writes {
            w.set_voxel(chunk, vx, v).unwrap();
        }
        assert_consistent_world(&w)?;
    }

    // Evicting, re-touching and inserting chunks keeps every border consistent,
    // and evicted chunks come back consistent with empty surroundings
    #[test]
    fn chunk_moves_keep_invariant(ops in prop::collection::vec(world_op(), 1..20)) {
        let mut w = WorldChunk::new();
        let mut spare: Vec<Box<VoxelChunk>> = Vec::new();
        for op in ops {
            match op {
                WorldOp::Write(c, vx, v) => {
                    w.set_voxel(c, vx, v).unwrap();
                }
                WorldOp::Evict((x, y, z)) => {
                    if let Some(c) = w.evict(x, y, z).unwrap() {
                        assert_consistent_detached(&c)?;
                        spare.push(c);
                    }
                }
                WorldOp::Touch((x, y, z)) => {
                    w.get(x, y, z).unwrap();
                }
                WorldOp::Insert((x, y, z), v) => {
                    let chunk = spare.pop().unwrap_or_else(|| {
                        let mut c = Box::new(VoxelChunk::new());
                        c.fill(v);
                        c
                    });
                    if let Some(old) = w.insert(x, y, z, chunk).unwrap() {
                        spare.push(old);
                    }
                }
            }
            assert_consistent_world(&w)?;
        }
    }

    // Applying the same write twice equals applying it once
    #[test]
    fn repeated_write_is_idempotent(
        seed in prop::collection::vec((coord4(), voxel()), 0..8),
        target in coord4(),
        v in voxel(),
    ) {
        let mut c = VoxelChunk::new();
        for ((x, y, z), sv) in seed {
            c.set(x, y, z, sv).unwrap();
        }
        c.set(target.0, target.1, target.2, v).unwrap();
        let once = c.states().to_vec();
        let count_once = c.vertex_count();
        prop_assert_eq!(c.set(target.0, target.1, target.2, v), Ok(false));
        prop_assert_eq!(c.states(), &once[..]);
        prop_assert_eq!(c.vertex_count(), count_once);
    }

    // One lone sub-cell anywhere renders as a full cube, and removing it clears the chunk
    #[test]
    fn single_toggle(vx in coord4(), cell in 0u32..64) {
        let mut c = VoxelChunk::new();
        let v = Voxel::new(1, SubVoxel::EMPTY.set(cell, true));
        c.set(vx.0, vx.1, vx.2, v).unwrap();
        prop_assert_eq!(c.vertex_count(), 24);
        c.set(vx.0, vx.1, vx.2, Voxel::EMPTY).unwrap();
        prop_assert_eq!(c.vertex_count(), 0);
    }

    // An exposed face toward an empty neighbor stays exposed while unrelated cells change
    #[test]
    fn exposure_persists_until_pair_changes(
        cell in (1u32..15, 1u32..15, 1u32..15),
        others in prop::collection::vec((coord4(), voxel()), 0..8),
    ) {
        let vk = MortonKey::encode(cell.0 / 4, cell.1 / 4, cell.2 / 4);
        let mut c = VoxelChunk::new();
        let up = MortonKey::encode(cell.0, cell.1 + 1, cell.2);
        for ((x, y, z), v) in others {
            let touched = MortonKey::encode(x, y, z);
            // skip writes to the voxels holding the cell or its upper neighbor
            if touched == vk || touched == MortonKey::encode(up.x() / 4, up.y() / 4, up.z() / 4) {
                continue;
            }
            c.set(x, y, z, v).unwrap();
        }
        let local = MortonKey::encode(cell.0 % 4, cell.1 % 4, cell.2 % 4);
        let (x, y, z) = vk.decode();
        c.set(x, y, z, Voxel::new(1, SubVoxel::EMPTY.set(local.raw(), true))).unwrap();
        let key = MortonKey::encode(cell.0, cell.1, cell.2);
        prop_assert!(c.neighbor_state(key).unwrap().is_exposed(Face::Up));
    }
}

#[test]
fn enclosed_chunk_has_no_faces() {
    let mut w = WorldChunk::new();
    w.fill_chunk(1, 1, 1, Voxel::solid(1)).unwrap();
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        w.fill_chunk((1 + dx) as u32, (1 + dy) as u32, (1 + dz) as u32, Voxel::solid(2)).unwrap();
    }
    let center = w.loaded(MortonKey::encode(1, 1, 1)).unwrap();
    assert_eq!(center.vertex_count(), 0);
}

#[test]
fn lone_filled_chunk_exposes_its_shell() {
    let mut w = WorldChunk::new();
    w.fill_chunk(1, 1, 1, Voxel::solid(1)).unwrap();
    let center = w.loaded(MortonKey::encode(1, 1, 1)).unwrap();
    assert_eq!(center.vertex_count(), 6 * 16 * 16 * 4);
    // neighbors were touched but stay empty
    for key in MortonKey::cube(2).filter(|k| *k != MortonKey::encode(1, 1, 1)) {
        assert_eq!(w.loaded(key).map_or(0, |c| c.vertex_count()), 0);
    }
}

#[test]
fn filled_world_exposes_only_outer_shell() {
    let mut w = WorldChunk::new();
    w.fill(Voxel::solid(1));
    assert_eq!(w.loaded_count(), 64);
    assert_eq!(w.vertex_count(), 6 * 64 * 64 * 4);
}

#[test]
fn cross_chunk_propagation_either_order() {
    let a_cell = SubVoxel::EMPTY.set_xyz(0, 2, 2, true).unwrap();
    let b_cell = SubVoxel::EMPTY.set_xyz(3, 2, 2, true).unwrap();
    let a_key = MortonKey::encode(0, 2, 2);
    let b_key = MortonKey::encode(15, 2, 2);

    for a_first in [true, false] {
        let mut w = WorldChunk::new();
        // A is chunk (1,0,0) at its left edge; B is chunk (0,0,0) at its right edge
        let write_a = |w: &mut WorldChunk| w.set_voxel((1, 0, 0), (0, 0, 0), Voxel::new(1, a_cell)).unwrap();
        let write_b = |w: &mut WorldChunk| w.set_voxel((0, 0, 0), (3, 0, 0), Voxel::new(1, b_cell)).unwrap();
        if a_first {
            write_a(&mut w);
            let b = w.loaded(MortonKey::encode(0, 0, 0)).unwrap();
            assert!(!b.neighbor_state(b_key).unwrap().is_solid());
            assert!(w.loaded(MortonKey::encode(1, 0, 0)).unwrap().neighbor_state(a_key).unwrap().is_exposed(Face::Left));
            write_b(&mut w);
        } else {
            write_b(&mut w);
            assert!(w.loaded(MortonKey::encode(0, 0, 0)).unwrap().neighbor_state(b_key).unwrap().is_exposed(Face::Right));
            write_a(&mut w);
        }
        let a = w.loaded(MortonKey::encode(1, 0, 0)).unwrap().neighbor_state(a_key).unwrap();
        let b = w.loaded(MortonKey::encode(0, 0, 0)).unwrap().neighbor_state(b_key).unwrap();
        assert!(!a.is_exposed(Face::Left));
        assert!(!b.is_exposed(Face::Right));
        assert_eq!(w.vertex_count(), 40);

        // removing one side re-exposes the other
        w.set_voxel((0, 0, 0), (3, 0, 0), Voxel::EMPTY).unwrap();
        let a = w.loaded(MortonKey::encode(1, 0, 0)).unwrap().neighbor_state(a_key).unwrap();
        assert!(a.is_exposed(Face::Left));
        assert_eq!(w.vertex_count(), 24);
    }
}

#[test]
fn neighbor_cache_invalidated_by_border_write() {
    let mut w = WorldChunk::new();
    w.set_voxel((1, 0, 0), (0, 0, 0), Voxel::solid(1)).unwrap();
    let before = w.loaded(MortonKey::encode(1, 0, 0)).unwrap().vertex_count();
    w.set_voxel((0, 0, 0), (3, 0, 0), Voxel::solid(1)).unwrap();
    let after = w.loaded(MortonKey::encode(1, 0, 0)).unwrap().vertex_count();
    assert_eq!(before - after, 16 * 4);
}

#[test]
fn evicted_neighbor_reexposes_border() {
    let mut w = WorldChunk::new();
    w.fill_chunk(0, 0, 0, Voxel::solid(1)).unwrap();
    w.fill_chunk(1, 0, 0, Voxel::solid(1)).unwrap();
    assert_eq!(w.loaded(MortonKey::encode(0, 0, 0)).unwrap().vertex_count(), 5 * 16 * 16 * 4);

    let gone = w.evict(1, 0, 0).unwrap().unwrap();
    assert_eq!(gone.vertex_count(), 6 * 16 * 16 * 4);
    w.get(1, 0, 0).unwrap();
    let a = w.loaded(MortonKey::encode(0, 0, 0)).unwrap();
    assert!(a.neighbor_state(MortonKey::encode(15, 3, 3)).unwrap().is_exposed(Face::Right));
    assert_eq!(a.vertex_count(), 6 * 16 * 16 * 4);
    assert!(a.is_dirty());
    assert_consistent_world(&w).unwrap();
}

#[test]
fn inserted_chunk_joins_neighbor_border() {
    let mut w = WorldChunk::new();
    w.fill_chunk(0, 0, 0, Voxel::solid(1)).unwrap();
    let mut b = Box::new(VoxelChunk::new());
    b.fill(Voxel::solid(1));
    w.insert(1, 0, 0, b).unwrap();

    let a = w.loaded(MortonKey::encode(0, 0, 0)).unwrap();
    let b = w.loaded(MortonKey::encode(1, 0, 0)).unwrap();
    assert!(!a.neighbor_state(MortonKey::encode(15, 3, 3)).unwrap().is_exposed(Face::Right));
    assert!(!b.neighbor_state(MortonKey::encode(0, 3, 3)).unwrap().is_exposed(Face::Left));
    assert_eq!(w.vertex_count(), 2 * 5 * 16 * 16 * 4);
    assert_consistent_world(&w).unwrap();
}
