//! # engine_app — demo scene
//!
//! Builds a small scene (a camera, the "YellowCubic" body and a player),
//! attaches the sample scripts and runs the frame loop.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags and load the optional JSON config.
//! 2. Initialise structured logging.
//! 3. Build the scene and register the script classes.
//! 4. Run frames until `max_frames` (forever when 0).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_app::scripts::{self, CameraController, Player};
use engine_app::{RuntimeConfig, ScriptRuntime};
use engine_component::EntityId;
use engine_math::{Camera, Rigidbody2D, Transform, Vec3};

#[derive(Parser)]
#[command(name = "engine_app", about = "Script runtime demo scene")]
struct Args {
    /// Path to a JSON runtime config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to run (0 = unlimited); overrides the config
    #[arg(short, long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RuntimeConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RuntimeConfig::default(),
    };
    if let Some(frames) = args.frames {
        config = config.with_max_frames(frames);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!(
        frame_rate = config.frame_rate,
        max_frames = config.max_frames,
        "engine_app starting"
    );

    let mut runtime = ScriptRuntime::new(config);
    scripts::register_all(runtime.classes_mut());
    build_scene(&mut runtime)?;

    runtime.run();

    info!(frames = runtime.frame(), "engine_app shut down");
    Ok(())
}

fn build_scene(runtime: &mut ScriptRuntime) -> Result<()> {
    let camera = runtime.create_entity("Camera");
    let player = runtime.create_entity("Player");
    {
        let mut world = runtime.host().world_mut();
        world.add_component(camera.id(), Camera::default())?;

        let cubic = world.create_entity_with_id(EntityId(42), CameraController::TARGET)?;
        world.add_component(cubic, Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)))?;
        world.add_component(cubic, Rigidbody2D::dynamic())?;

        world.add_component(player.id(), Rigidbody2D::dynamic())?;
    }
    runtime.attach_script(camera.id(), CameraController::CLASS)?;
    runtime.attach_script(player.id(), Player::CLASS)?;
    Ok(())
}
