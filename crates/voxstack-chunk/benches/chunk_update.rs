use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use voxstack_blocks::{SubVoxel, Voxel};
use voxstack_chunk::{VoxelChunk, WorldChunk, fill_mesh};
use voxstack_mesh_cpu::MeshOutput;

fn checker() -> SubVoxel {
    SubVoxel::from_fn(|x, y, z| (x + y + z) % 2 == 0)
}

fn bench_single_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_single_toggle");
    let mut chunk = VoxelChunk::new();
    chunk.fill(Voxel::solid(1));
    let mut on = false;
    group.bench_function("interior_voxel_16x16x16", |b| {
        b.iter(|| {
            on = !on;
            let v = if on { Voxel::EMPTY } else { Voxel::solid(1) };
            black_box(chunk.set(1, 2, 1, v).unwrap());
        })
    });
    group.finish();
}

fn bench_world_border_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_border_writes");
    let mut world = WorldChunk::new();
    world.fill(Voxel::solid(1));
    let mut phase = false;
    group.bench_function("corner_voxel_checker", |b| {
        b.iter(|| {
            phase = !phase;
            let v = if phase { Voxel::new(1, checker()) } else { Voxel::solid(1) };
            black_box(world.set_voxel((1, 1, 1), (3, 3, 3), v).unwrap());
        })
    });
    group.finish();
}

fn bench_fill_and_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_and_mesh");
    let mut out = MeshOutput::default();
    group.bench_function("checker_chunk", |b| {
        b.iter(|| {
            let mut chunk = VoxelChunk::new();
            chunk.fill(Voxel::new(1, checker()));
            fill_mesh(&chunk, &mut out);
            black_box(out.vertex_count());
        })
    });
    group.finish();
}

fn configure() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
}

criterion_group! {
    name = benches;
    config = configure();
    targets = bench_single_toggle, bench_world_border_writes, bench_fill_and_mesh
}
criterion_main!(benches);
