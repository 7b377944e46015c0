//! Headless world generator.
//!
//! Loads `config.ron`, applies CLI overrides, then walks east from a start
//! position, streaming the chunk radius at every step and reporting what was
//! generated. Run with `cargo run -p voxpost-worldgen -- --seed 42 --steps 4`.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use glam::IVec3;
use tracing::{error, info};
use voxpost_config::{CliArgs, Config, default_config_dir};
use voxpost_world::{ChunkManager, ChunkStreamer, WorldError};

/// CLI arguments for the worldgen binary.
#[derive(Parser, Debug)]
#[command(name = "voxpost-worldgen", about = "Generate and stream voxel terrain headlessly")]
struct WorldgenArgs {
    #[command(flatten)]
    world: CliArgs,

    /// Start position, world x.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f64,

    /// Start position, world z.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    z: f64,

    /// Number of one-chunk steps to walk east.
    #[arg(long, default_value_t = 1)]
    steps: u32,

    /// Dig out the surface cell under the start position before walking.
    #[arg(long)]
    dig: bool,
}

fn run(args: &WorldgenArgs, config: &Config) -> Result<(), WorldError> {
    let manager = Arc::new(ChunkManager::from_config(config)?);
    let mut streamer = ChunkStreamer::from_config(Arc::clone(&manager), config)?;

    let (x0, z0) = (args.x.floor() as i32, args.z.floor() as i32);
    info!(
        preset = %config.world.preset,
        seed = config.world.seed,
        biome = ?manager.biome_at(x0, z0),
        height = manager.height_at(x0, z0),
        "start column"
    );

    if args.dig
        && let Some(surface) = manager.get_surface_height_at(x0, z0)
    {
        manager.remove_terrain_block_at_world(IVec3::new(x0, surface, z0));
        info!(
            x = x0,
            z = z0,
            removed = surface,
            surface = ?manager.get_surface_height_at(x0, z0),
            "dug surface cell"
        );
    }

    let step = manager.layout().size_x() as f64;
    for i in 0..args.steps.max(1) {
        let x = args.x + step * f64::from(i);
        let entries = streamer.update_blocking(x, args.z);
        info!(step = i, x, chunks = entries.len(), "streamed");
    }
    let finished = streamer.drain_completed().len();

    let meshes = manager.get_all_terrain_meshes();
    for batch in &meshes {
        info!(kind = batch.kind.material_name(), instances = batch.len(), "batch");
    }
    info!(
        background = finished,
        foliage_colliders = manager.get_foliage_collision_cells().len(),
        "{}",
        manager.stats()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = WorldgenArgs::parse();

    let config_dir = args.world.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.world);

    let log_dir = config_dir.join("logs");
    voxpost_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("world generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
