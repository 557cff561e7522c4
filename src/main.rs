use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use blockmania_blocks::BlockRegistry;
use blockmania_chunk::{ChunkHandle, LightKind, RenderType};
use blockmania_geom::Vec3;
use blockmania_mesh::{FaceMesher, GpuBackend, HeadlessBackend};
use blockmania_runtime::{MeshWorkers, World};
use blockmania_world::{ChunkCoord, WorldConfig, load_world_config};
use clap::Parser;
use crossbeam_channel::{Receiver, unbounded};

#[derive(Parser, Debug)]
#[command(name = "blockmania", about = "Headless chunk simulation")]
struct Args {
    /// World config (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Block list (TOML) replacing the built-in registry.
    #[arg(long)]
    blocks: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// View radius in chunks.
    #[arg(long)]
    radius: Option<i32>,
    /// Mesh worker threads; 0 meshes on the simulation thread.
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    save_dir: Option<PathBuf>,
    #[arg(long, default_value_t = 16)]
    ticks: u32,
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Blocks the rendering origin moves along +X each tick.
    #[arg(long, default_value_t = 0.0)]
    walk: f32,
}

#[derive(Debug, Default)]
struct RenderStats {
    frames: u64,
    swaps: u64,
}

fn render_loop(frames: Receiver<Vec<ChunkHandle>>) -> RenderStats {
    let mut stats = RenderStats::default();
    while let Ok(handles) = frames.recv() {
        stats.frames += 1;
        for h in &handles {
            h.generate_vbos();
            if h.update() {
                stats.swaps += 1;
            }
        }
        // Opaque front to back, translucent back to front.
        for h in handles.iter().filter(|h| h.is_visible()) {
            h.render(RenderType::Opaque);
        }
        for h in handles.iter().rev().filter(|h| h.is_visible()) {
            h.render(RenderType::Translucent);
        }
    }
    stats
}

fn surface_y(world: &World, wx: i32, wz: i32) -> Option<i32> {
    (0..world.dims().y as i32)
        .rev()
        .find(|&y| world.get_block(wx, y, wz) != 0)
}

fn sample_edits(world: &mut World) {
    let reg = Arc::clone(world.registry());
    let named = |name: &str| reg.id_by_name(name).unwrap_or(0);
    if let Some(h) = surface_y(world, 4, 4) {
        world.set_block(4, h + 1, 4, named("torch"));
        log::info!(
            "torch at (4, {}, 4): block light {}",
            h + 1,
            world.get_light(4, h + 1, 4, LightKind::Block)
        );
    }
    if let Some(h) = surface_y(world, 9, 2) {
        for y in (h - 3).max(1)..=h {
            world.set_block(9, y, 2, 0);
        }
        log::info!(
            "dug shaft at (9, 2) down to y={}: sky light {}",
            (h - 3).max(1),
            world.get_light(9, (h - 3).max(1), 2, LightKind::Sky)
        );
    }
    if let Some(h) = surface_y(world, -3, 5) {
        world.set_block(-3, h + 1, 5, named("glass"));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_world_config(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(r) = args.radius {
        config.view_radius = r.max(0);
    }
    if let Some(n) = args.workers {
        config.mesh_workers = n;
    }
    if let Some(dir) = &args.save_dir {
        config.save_dir = Some(dir.clone());
    }
    config.validate()?;

    let reg = Arc::new(match &args.blocks {
        Some(path) => BlockRegistry::load_from_path(path)?,
        None => BlockRegistry::builtin(),
    });
    let backend = Arc::new(HeadlessBackend::new());
    let gpu: Arc<dyn GpuBackend> = backend.clone();
    let mut world = World::new(config.clone(), Arc::clone(&reg), Arc::clone(&gpu));
    if config.mesh_workers > 0 {
        let workers = MeshWorkers::new(config.mesh_workers, FaceMesher::new(reg), gpu)?;
        world = world.with_mesh_workers(workers);
    }
    log::info!(
        "world seed={} chunk={}x{}x{} radius={} mesh_workers={}",
        config.seed,
        config.chunk.x,
        config.chunk.y,
        config.chunk.z,
        config.view_radius,
        config.mesh_workers
    );

    let (frame_tx, frame_rx) = unbounded::<Vec<ChunkHandle>>();
    let render = thread::Builder::new()
        .name("render".into())
        .spawn(move || render_loop(frame_rx))?;

    let dims = config.chunk;
    let radius = config.view_radius;
    let view_distance = f64::from(radius + 1) * dims.x.max(dims.z) as f64;
    let t_start = Instant::now();
    for tick in 0..args.ticks {
        let origin = Vec3::new(tick as f32 * args.walk, 0.0, 0.0);
        world.set_rendering_origin(origin);
        let center = ChunkCoord::containing(origin.x as i32, origin.z as i32, dims);

        let mut ring: Vec<ChunkCoord> = (-radius..=radius)
            .flat_map(|dz| (-radius..=radius).map(move |dx| center.offset(dx, dz)))
            .collect();
        ring.sort_by_key(|c| (c.x - center.x).pow(2) + (c.z - center.z).pow(2));
        let worked = ring.iter().filter(|&&c| world.process_chunk(c)).count();

        if tick == 1 {
            sample_edits(&mut world);
        }
        let unloaded = world.unload_outside(center, radius + 1)?;
        let meshed = world.drain_mesh_results().len();
        world.update_visibility(view_distance);
        log::debug!(
            "tick {}: {} chunks worked, {} async meshes, {} unloaded, {} resident",
            tick,
            worked,
            meshed,
            unloaded,
            world.resident_count()
        );
        if frame_tx.send(world.render_handles()).is_err() {
            log::warn!("render thread stopped early");
            break;
        }
        thread::sleep(Duration::from_millis(args.tick_ms));
    }

    if let Some(workers) = world.mesh_workers() {
        let deadline = Instant::now() + Duration::from_secs(5);
        while workers.queue_counts() != (0, 0) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }
    world.drain_mesh_results();
    drop(frame_tx);
    let render_stats = render.join().map_err(|_| "render thread panicked")?;

    let saved = world.save_all()?;
    let stats = world.stats();
    let gpu_stats = backend.stats();
    log::info!(
        "{} ticks in {:.2}s: generated={} loaded={} relit={} meshed={} mesh_jobs={} unloaded={} saved={}",
        args.ticks,
        t_start.elapsed().as_secs_f64(),
        stats.generated,
        stats.loaded,
        stats.relit,
        stats.meshed,
        stats.mesh_jobs,
        stats.unloaded,
        saved
    );
    log::info!(
        "render: frames={} swaps={} uploads={} draws={} live_buffers={} quads={}",
        render_stats.frames,
        render_stats.swaps,
        gpu_stats.uploads,
        gpu_stats.draws,
        gpu_stats.live_buffers(),
        gpu_stats.quads_uploaded
    );
    Ok(())
}
