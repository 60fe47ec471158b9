mod config;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use config::{SceneConfig, load_scene_from_path};
use voxstack_chunk::{WorldChunk, fill_mesh};
use voxstack_edit::EditQueue;
use voxstack_mesh_cpu::MeshOutput;

#[derive(Parser, Debug)]
#[command(name = "voxstack", about = "Builds a sub-voxel world from a scene file and reports its exposed faces")]
struct Args {
    /// Scene TOML; the built-in demo scene is used when absent
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Assemble a debug mesh for every rebuilt chunk
    #[arg(long)]
    mesh: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let scene = match &args.scene {
        Some(path) => {
            log::info!("loading scene {}", path.display());
            load_scene_from_path(path)?
        }
        None => SceneConfig::demo(),
    };

    let mut world = WorldChunk::new();
    let mut queue = EditQueue::new();
    queue.extend(scene.edits());
    log::info!("queued {} edits", queue.len());
    let applied = queue.apply_edits(&mut world);

    let build_mesh = args.mesh || scene.world.mesh;
    let mut mesh = MeshOutput::default();
    let mut triangles = 0usize;
    let rebuilt = queue.rebuild_if_dirty(&mut world, |key, chunk| {
        if build_mesh {
            fill_mesh(chunk, &mut mesh);
            triangles += mesh.triangle_count();
            log::debug!("chunk {:?}: {} triangles", key.decode(), mesh.triangle_count());
        }
    });

    let stats = queue.stats();
    log::info!(
        "applied={} unchanged={} rejected={} chunks={} rebuilt={}",
        applied.applied,
        applied.unchanged,
        applied.rejected,
        world.loaded_count(),
        rebuilt.rebuilt
    );
    println!("chunks loaded:  {}", world.loaded_count());
    println!("edits applied:  {} ({} rejected)", applied.applied, applied.rejected);
    println!("vertices:       {}", stats.built_vertices);
    if build_mesh {
        println!("triangles:      {triangles}");
    }
    Ok(())
}
